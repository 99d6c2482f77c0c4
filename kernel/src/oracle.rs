//! External collaborator traits: the AIG network oracle and the SAT
//! solver oracle.
//!
//! Neither AIG parsing/construction nor the SAT solver itself is built by
//! this crate — this module only states the shape a network and a solver
//! must present to the encoder and the PDR engine, in the style of
//! `SearchWorldV1` in `search/src/contract.rs`.

use std::fmt;

/// A SAT variable: a dense, zero-based index into the solver's variable
/// space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    /// Construct from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A SAT literal: a variable plus polarity.
///
/// Packed as `2*var + negated` (MiniSat convention), so `Lit` stays
/// `Copy`, orderable, and allocation-free.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    /// The positive literal of `v`.
    #[must_use]
    pub const fn pos(v: Var) -> Self {
        Self(v.0 * 2)
    }

    /// The negative literal of `v`.
    #[must_use]
    pub const fn neg(v: Var) -> Self {
        Self(v.0 * 2 + 1)
    }

    /// Construct with explicit polarity: `negated = true` gives `¬v`.
    #[must_use]
    pub const fn new(v: Var, negated: bool) -> Self {
        if negated {
            Self::neg(v)
        } else {
            Self::pos(v)
        }
    }

    /// The underlying variable.
    #[must_use]
    pub const fn var(self) -> Var {
        Var(self.0 / 2)
    }

    /// True if this literal is negated.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        self.0 % 2 == 1
    }

    /// The complementary literal.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            write!(f, "-{:?}", self.var())
        } else {
            write!(f, "{:?}", self.var())
        }
    }
}

/// A three-valued model assignment: the SAT solver's view of a variable
/// after a satisfying call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LBool {
    True,
    False,
    Undef,
}

impl LBool {
    /// Read as a concrete boolean. Panics on `Undef` — reading an
    /// unassigned model variable is a programmer error (the caller must
    /// only query variables relevant to the solved formula).
    #[must_use]
    pub fn expect_bool(self) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Undef => panic!("LBool::expect_bool called on Undef"),
        }
    }
}

/// A net identifier in the AIG network: a dense, zero-based index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetId(u32);

impl NetId {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A reference to a net with an inversion flag, as returned by
/// [`NetworkOracle::input_net_id`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NetRef {
    pub id: NetId,
    pub inverted: bool,
}

/// The gate type of a net: `{PI, PIO, FF, AIG_NODE, AIG_FALSE}`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GateType {
    /// Primary input.
    Pi,
    /// Primary input/output (treated identically to `Pi` by the encoder).
    Pio,
    /// Flip-flop (latch).
    Ff,
    /// Two-input AND node.
    AigNode,
    /// The constant-false sentinel net.
    AigFalse,
}

/// The AIG network oracle: everything the encoder and PDR engine need to
/// read about the circuit under verification.
///
/// Implementations are responsible for AIG parsing/construction; this
/// trait only states the read surface the encoder consumes.
pub trait NetworkOracle {
    /// Number of latches.
    fn latch_size(&self) -> usize;

    /// Number of primary inputs.
    fn input_size(&self) -> usize;

    /// Total number of nets (the id space size).
    fn net_size(&self) -> usize;

    /// Bit width of the given net (1 for single-bit AIG nets).
    fn net_width(&self, id: NetId) -> u32;

    /// The net id of the `i`-th latch.
    fn get_latch(&self, i: usize) -> NetId;

    /// The net id of the `i`-th primary input.
    fn get_input(&self, i: usize) -> NetId;

    /// The net id of the `i`-th primary output.
    fn get_output(&self, i: usize) -> NetId;

    /// The gate type of `id`.
    fn gate_type(&self, id: NetId) -> GateType;

    /// The `k`-th fan-in of `id`. For an AND node, `k in {0, 1}` are its
    /// two operands. For a latch, `k = 0` is its D-input and `k = 1` is
    /// its initial-value source net (a constant net whose gate type is
    /// irrelevant beyond reading its inversion flag).
    fn input_net_id(&self, id: NetId, k: usize) -> NetRef;

    /// A DFS-ordered traversal of the combinational fan-in closure of all
    /// latch D-inputs and all primary outputs — the order ternary
    /// simulation must evaluate nets in so that every net's fan-in is
    /// simulated before the net itself.
    fn dfs_order(&self) -> Vec<NetId>;
}

/// The SAT solver oracle: an incremental CDCL solver supporting
/// assumption-based solving and UNSAT-core extraction, in the style of
/// MiniSat.
///
/// The solver itself is not built by this crate — this trait only states
/// the interface the frame manager and encoder drive.
pub trait SatSolver {
    /// Allocate and return a fresh variable.
    fn new_var(&mut self) -> Var;

    /// Add a (possibly multi-literal) clause.
    fn add_clause(&mut self, lits: &[Lit]);

    /// Add a unit clause.
    fn add_unit(&mut self, lit: Lit) {
        self.add_clause(&[lit]);
    }

    /// Solve with no assumptions. Returns `true` if satisfiable.
    fn solve(&mut self) -> bool;

    /// Solve under the given assumption literals. Returns `true` if
    /// satisfiable.
    fn solve_assuming(&mut self, assumptions: &[Lit]) -> bool;

    /// True if the solver's clause database is still satisfiable (not in
    /// a permanently-UNSAT, unusable state).
    fn okay(&self) -> bool;

    /// The model value of `v` after a satisfying [`solve`](Self::solve)
    /// or [`solve_assuming`](Self::solve_assuming) call.
    fn model_value(&self, v: Var) -> LBool;

    /// The final assumption literals appearing in the UNSAT core, valid
    /// after an unsatisfying [`solve_assuming`](Self::solve_assuming) call.
    fn conflict(&self) -> &[Lit];

    /// Run the solver's internal simplification pass. Returns `false` if
    /// simplification proved the database UNSAT.
    fn simplify_db(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_polarity_round_trips() {
        let v = Var::new(3);
        let p = Lit::pos(v);
        let n = Lit::neg(v);
        assert_eq!(p.var(), v);
        assert_eq!(n.var(), v);
        assert!(!p.is_negated());
        assert!(n.is_negated());
        assert_eq!(p.negate(), n);
        assert_eq!(n.negate(), p);
    }

    #[test]
    fn lit_new_matches_pos_neg() {
        let v = Var::new(7);
        assert_eq!(Lit::new(v, false), Lit::pos(v));
        assert_eq!(Lit::new(v, true), Lit::neg(v));
    }

    #[test]
    fn lbool_expect_bool_matches_variant() {
        assert!(LBool::True.expect_bool());
        assert!(!LBool::False.expect_bool());
    }

    #[test]
    #[should_panic(expected = "Undef")]
    fn lbool_expect_bool_panics_on_undef() {
        let _ = LBool::Undef.expect_bool();
    }
}
