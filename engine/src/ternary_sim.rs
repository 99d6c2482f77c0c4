//! Ternary-simulation cube generalization.
//!
//! Grounded in `ternarySimulation`/`v3SimOneGate`/`ternarySimInit` in
//! `examples/original_source/pdr/v3SvrPDRSat.cpp`, with one deliberate
//! change from that source: a rejected weakening is *reverted* here, so
//! each latch's tentative X is undone before the next latch is tried
//! whenever the target invariant fails — the original's `_Value3List`
//! does not clearly revert its internal simulation state on rejection.
//! This implementation always re-seeds from the latest committed
//! `working` cube before each re-simulation, so there is no ambiguity: a
//! latch's weakening is kept iff it alone, with every previously-committed
//! weakening, still preserves the target.

use pdr_kernel::cube::Cube;
use pdr_kernel::oracle::{GateType, NetId, NetRef, NetworkOracle};
use pdr_kernel::ternary::Ternary;

/// Reusable per-net ternary simulation buffer, sized once per network and
/// reused across every generalization call, so repeated weakening
/// attempts allocate nothing past construction.
pub struct TernarySimulator {
    values: Vec<Ternary>,
}

impl TernarySimulator {
    /// Construct a simulator for a network with `net_size` nets.
    #[must_use]
    pub fn new(net_size: usize) -> Self {
        Self {
            values: vec![Ternary::X; net_size],
        }
    }

    fn read<N: NetworkOracle>(&self, _network: &N, r: NetRef) -> Ternary {
        let v = self.values[r.id.index()];
        if r.inverted {
            v.not()
        } else {
            v
        }
    }

    fn seed_sources<N: NetworkOracle>(&mut self, network: &N, latches: &Cube, inputs: &[Ternary]) {
        for i in 0..network.input_size() {
            self.values[network.get_input(i).index()] = inputs[i];
        }
        for i in 0..network.latch_size() {
            self.values[network.get_latch(i).index()] = latches.get(i);
        }
    }

    /// Forward three-valued simulation over `dfs_order`. Primary inputs
    /// and latches are simulation sources (pre-seeded by
    /// [`seed_sources`](Self::seed_sources)); this loop only resolves
    /// combinational nets.
    fn simulate<N: NetworkOracle>(&mut self, network: &N, dfs_order: &[NetId]) {
        for &id in dfs_order {
            match network.gate_type(id) {
                GateType::AigFalse => self.values[id.index()] = Ternary::ZERO,
                GateType::AigNode => {
                    let a = network.input_net_id(id, 0);
                    let b = network.input_net_id(id, 1);
                    let va = self.read(network, a);
                    let vb = self.read(network, b);
                    self.values[id.index()] = va.and(vb);
                }
                GateType::Pi | GateType::Pio | GateType::Ff => {}
            }
        }
    }

    /// Mode A: generalize a bad-state cube extracted from a SAT model,
    /// preserving "the monitor output is still concretely 1".
    #[must_use]
    pub fn generalize_bad_cube<N: NetworkOracle>(
        &mut self,
        network: &N,
        dfs_order: &[NetId],
        monitor: NetRef,
        inputs: &[Ternary],
        model: &Cube,
    ) -> Cube {
        let mut working = model.clone();
        for i in 0..network.latch_size() {
            let original = working.get(i);
            working.weaken(i);

            self.seed_sources(network, &working, inputs);
            self.simulate(network, dfs_order);

            let monitor_still_one = {
                let v = self.read(network, monitor);
                !v.is_dont_care() && v.bit()
            };
            if !monitor_still_one {
                working.set(i, original);
            }
        }
        working
    }

    /// Mode B: generalize a predecessor cube found by relative induction,
    /// preserving "every latch's D-input still simulates to a concrete
    /// value" — the generalized cube must still determine the successor
    /// state it was extracted to explain.
    #[must_use]
    pub fn generalize_predecessor<N: NetworkOracle>(
        &mut self,
        network: &N,
        dfs_order: &[NetId],
        inputs: &[Ternary],
        model: &Cube,
    ) -> Cube {
        let d_inputs: Vec<NetRef> = (0..network.latch_size())
            .map(|i| network.input_net_id(network.get_latch(i), 0))
            .collect();

        let mut working = model.clone();
        for i in 0..network.latch_size() {
            let original = working.get(i);
            working.weaken(i);

            self.seed_sources(network, &working, inputs);
            self.simulate(network, dfs_order);

            let any_d_input_unknown = d_inputs
                .iter()
                .any(|&r| self.read(network, r).is_dont_care());
            if any_d_input_unknown {
                working.set(i, original);
            }
        }
        working
    }
}
