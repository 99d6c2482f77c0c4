//! `ToyNetwork`: a hand-buildable, in-memory AIG-with-latches
//! implementing [`NetworkOracle`], in the style of the `worlds/` fixtures
//! in `examples/darianrosebrook-sterling-native/harness/src/worlds/` —
//! small, explicitly constructed domain instances for exercising the
//! engine end to end, not a parser for any on-disk circuit format.

use pdr_kernel::oracle::{GateType, NetId, NetRef, NetworkOracle};

const FALSE_ID: NetId = NetId::new(0);

enum ToyGate {
    False,
    Input,
    And(NetRef, NetRef),
    Latch { d: NetRef, init: NetRef },
}

/// A network under construction: call [`ToyNetwork::add_input`],
/// [`ToyNetwork::add_and`], and [`ToyNetwork::add_latch`] to grow it, then
/// use it directly as a [`NetworkOracle`].
pub struct ToyNetwork {
    gates: Vec<ToyGate>,
    latches: Vec<NetId>,
    inputs: Vec<NetId>,
    outputs: Vec<NetId>,
}

impl ToyNetwork {
    /// A network with only the constant-false net.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gates: vec![ToyGate::False],
            latches: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// The constant-false net, read positively.
    #[must_use]
    pub fn false_net(&self) -> NetRef {
        NetRef {
            id: FALSE_ID,
            inverted: false,
        }
    }

    /// Allocate a new primary input.
    pub fn add_input(&mut self) -> NetId {
        let id = NetId::new(u32::try_from(self.gates.len()).expect("toy network overflow"));
        self.gates.push(ToyGate::Input);
        self.inputs.push(id);
        id
    }

    /// Allocate a new two-input AND node.
    pub fn add_and(&mut self, a: NetRef, b: NetRef) -> NetId {
        let id = NetId::new(u32::try_from(self.gates.len()).expect("toy network overflow"));
        self.gates.push(ToyGate::And(a, b));
        id
    }

    /// Allocate a new latch with the given D-input and initial-value
    /// source net (pass [`ToyNetwork::false_net`] for reset-to-0,
    /// inverted for reset-to-1).
    pub fn add_latch(&mut self, d: NetRef, init: NetRef) -> NetId {
        let id = NetId::new(u32::try_from(self.gates.len()).expect("toy network overflow"));
        self.gates.push(ToyGate::Latch { d, init });
        self.latches.push(id);
        id
    }

    /// Register `r.id` as a primary output. The inversion flag is
    /// informational only — [`NetworkOracle::get_output`] returns a bare
    /// `NetId`; scenarios that need an inverted monitor construct the
    /// [`NetRef`] by hand from `r`.
    pub fn add_output(&mut self, r: NetRef) -> NetId {
        self.outputs.push(r.id);
        r.id
    }

    /// The id the next [`ToyNetwork::add_latch`]/[`ToyNetwork::add_and`]
    /// call will assign — lets a caller build a latch whose D-input
    /// refers back to itself (e.g. a toggle flip-flop) before the latch
    /// exists, as long as nothing else is allocated in between.
    #[must_use]
    pub fn next_id(&self) -> NetId {
        NetId::new(u32::try_from(self.gates.len()).expect("toy network overflow"))
    }

    /// Replace `id`'s D-input after the fact. For wiring a latch whose
    /// D-input is a subgraph that itself must reference the latch's id:
    /// call [`ToyNetwork::add_latch`] first with a placeholder D-input to
    /// claim the id, build the subgraph (which can now name that id),
    /// then patch it in here.
    pub fn patch_latch_d_input(&mut self, id: NetId, d: NetRef) {
        match &mut self.gates[id.index()] {
            ToyGate::Latch { d: slot, .. } => *slot = d,
            _ => panic!("net {id:?} is not a latch"),
        }
    }
}

impl Default for ToyNetwork {
    fn default() -> Self {
        Self::new()
    }
}

fn visit(net: &ToyNetwork, id: NetId, visited: &mut [bool], order: &mut Vec<NetId>) {
    if visited[id.index()] {
        return;
    }
    visited[id.index()] = true;
    if let ToyGate::And(a, b) = &net.gates[id.index()] {
        visit(net, a.id, visited, order);
        visit(net, b.id, visited, order);
    }
    order.push(id);
}

impl NetworkOracle for ToyNetwork {
    fn latch_size(&self) -> usize {
        self.latches.len()
    }

    fn input_size(&self) -> usize {
        self.inputs.len()
    }

    fn net_size(&self) -> usize {
        self.gates.len()
    }

    fn net_width(&self, _id: NetId) -> u32 {
        1
    }

    fn get_latch(&self, i: usize) -> NetId {
        self.latches[i]
    }

    fn get_input(&self, i: usize) -> NetId {
        self.inputs[i]
    }

    fn get_output(&self, i: usize) -> NetId {
        self.outputs[i]
    }

    fn gate_type(&self, id: NetId) -> GateType {
        match self.gates[id.index()] {
            ToyGate::False => GateType::AigFalse,
            ToyGate::Input => GateType::Pi,
            ToyGate::And(..) => GateType::AigNode,
            ToyGate::Latch { .. } => GateType::Ff,
        }
    }

    fn input_net_id(&self, id: NetId, k: usize) -> NetRef {
        match self.gates[id.index()] {
            ToyGate::And(a, b) => {
                if k == 0 {
                    a
                } else {
                    b
                }
            }
            ToyGate::Latch { d, init } => {
                if k == 0 {
                    d
                } else {
                    init
                }
            }
            ToyGate::False | ToyGate::Input => panic!("net {id:?} has no fan-in"),
        }
    }

    fn dfs_order(&self) -> Vec<NetId> {
        let mut visited = vec![false; self.gates.len()];
        let mut order = Vec::new();
        for &latch in &self.latches {
            if let ToyGate::Latch { d, .. } = self.gates[latch.index()] {
                visit(self, d.id, &mut visited, &mut order);
            }
        }
        for &output in &self.outputs {
            visit(self, output, &mut visited, &mut order);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_latch_dfs_order_visits_nothing_but_is_well_formed() {
        // l0's D-input is its own negation; DFS from a latch D-input that
        // is itself a latch visits no combinational nets.
        let mut net = ToyNetwork::new();
        let false_net = net.false_net();
        let self_id = net.next_id();
        let l0 = net.add_latch(
            NetRef {
                id: self_id,
                inverted: true,
            },
            false_net,
        );
        assert_eq!(l0, self_id);
        assert_eq!(net.latch_size(), 1);
        assert!(net.dfs_order().is_empty());
    }

    #[test]
    fn and_node_dfs_order_visits_fanin_before_itself() {
        let mut net = ToyNetwork::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let and0 = net.add_and(
            NetRef { id: i0, inverted: false },
            NetRef { id: i1, inverted: false },
        );
        net.add_output(NetRef { id: and0, inverted: false });

        let order = net.dfs_order();
        assert_eq!(order, vec![and0]);
    }
}
