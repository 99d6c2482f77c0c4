//! `Cube` and `TCube`: partial assignments over latch variables.
//!
//! Ported in spirit from `Cube`/`TCube` in
//! `examples/original_source/pdr/PDRDef.h`, reshaped into owned,
//! deep-copy-on-generalize Rust types.
//!
//! # Semantics
//!
//! A [`Cube`] is a fixed-width vector of [`Ternary`] values, one slot per
//! latch. It denotes the conjunction, over all non-X slots, of the literal
//! `(latch_i = bit_i)`. An all-X cube is the tautology (true).
//!
//! Ownership: cubes are heap-allocated and owned by whichever structure
//! holds them (the obligation queue, a frame's blocked-cube set). Every
//! generalization step in this crate produces a *new* `Cube` (via
//! [`Cube::clone`]) rather than mutating in place, so the pre-generalization
//! witness always survives for the caller that still needs it.

use crate::ternary::Ternary;

/// Sentinel frame value: "no frame, the query was SAT" (relative induction
/// found a predecessor rather than proving unreachability).
pub const FRAME_NULL: i64 = -1;

/// Sentinel frame value: "inductive relative to all frames, forever."
pub const FRAME_INF: i64 = i64::MAX;

/// A partial assignment over latch variables: a conjunction of latch literals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cube {
    values: Vec<Ternary>,
}

impl Cube {
    /// Construct a cube of the given width with every slot X (the
    /// tautology / "all don't care" cube).
    #[must_use]
    pub fn all_x(width: usize) -> Self {
        Self {
            values: vec![Ternary::X; width],
        }
    }

    /// Construct a cube of the given width with every slot concretely 0.
    #[must_use]
    pub fn all_zero(width: usize) -> Self {
        Self {
            values: vec![Ternary::ZERO; width],
        }
    }

    /// Construct from a full bit vector (no X slots).
    #[must_use]
    pub fn from_bits(bits: &[bool]) -> Self {
        Self {
            values: bits.iter().map(|&b| Ternary::from_bool(b)).collect(),
        }
    }

    /// Construct from an explicit ternary vector.
    #[must_use]
    pub fn from_values(values: Vec<Ternary>) -> Self {
        Self { values }
    }

    /// Number of latch slots.
    #[must_use]
    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// Read the value at slot `i`. Panics if `i` is out of bounds — an
    /// out-of-range latch index is a programmer error.
    #[must_use]
    pub fn get(&self, i: usize) -> Ternary {
        self.values[i]
    }

    /// The underlying slots, in latch-index order.
    #[must_use]
    pub fn values(&self) -> &[Ternary] {
        &self.values
    }

    /// Set slot `i` to an explicit ternary value.
    pub fn set(&mut self, i: usize, value: Ternary) {
        self.values[i] = value;
    }

    /// Weaken slot `i` to X. This is the elementary step of generalization.
    ///
    /// Legality (that the resulting cube still satisfies the caller's
    /// invariant, e.g. "does not intersect the initial states") is the
    /// caller's responsibility — this method performs no check.
    pub fn weaken(&mut self, i: usize) {
        self.values[i] = Ternary::X;
    }

    /// True if `self` subsumes `other`: every non-X slot of `self` agrees
    /// with the corresponding slot of `other`. Equivalently, `self`'s
    /// literal set is a subset of `other`'s, so `self ⇒ other` as state
    /// predicates (when both are read as the negation of a blocked-cube
    /// clause).
    #[must_use]
    pub fn subsumes(&self, other: &Self) -> bool {
        debug_assert_eq!(self.width(), other.width());
        self.values.iter().zip(other.values.iter()).all(|(a, b)| {
            if a.is_dont_care() {
                true
            } else {
                !b.is_dont_care() && a.bit() == b.bit()
            }
        })
    }

    /// True iff this cube intersects the initial states: every latch slot
    /// is either X or agrees with that latch's initial value.
    ///
    /// `initial` gives the concrete initial bit for each latch, read from
    /// the initial-state literal vector. This consults the real per-latch
    /// initial value rather than hardcoding "all zero" (see DESIGN.md on
    /// this resolved open question).
    #[must_use]
    pub fn intersects_initial(&self, initial: &[bool]) -> bool {
        debug_assert_eq!(self.width(), initial.len());
        self.values
            .iter()
            .zip(initial.iter())
            .all(|(v, &init_bit)| v.is_dont_care() || v.bit() == init_bit)
    }
}

/// A timed cube: a cube paired with the frame it is associated with.
///
/// `frame` is either a non-negative frame index, [`FRAME_NULL`] ("no
/// frame, the query was SAT"), or [`FRAME_INF`] ("inductive relative to
/// all frames forever").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TCube {
    pub cube: Cube,
    pub frame: i64,
}

impl TCube {
    /// Construct a timed cube at a concrete, non-sentinel frame.
    #[must_use]
    pub fn new(cube: Cube, frame: i64) -> Self {
        Self { cube, frame }
    }

    /// Construct the "query was SAT, no frame" result.
    #[must_use]
    pub fn sat(cube: Cube) -> Self {
        Self {
            cube,
            frame: FRAME_NULL,
        }
    }

    /// Construct the "inductive relative to all frames forever" result.
    #[must_use]
    pub fn inductive_forever(cube: Cube) -> Self {
        Self {
            cube,
            frame: FRAME_INF,
        }
    }

    /// True if `frame` is the [`FRAME_NULL`] sentinel.
    #[must_use]
    pub fn is_null_frame(&self) -> bool {
        self.frame == FRAME_NULL
    }

    /// True if `frame` is the [`FRAME_INF`] sentinel.
    #[must_use]
    pub fn is_inf_frame(&self) -> bool {
        self.frame == FRAME_INF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsumption_is_reflexive() {
        let c = Cube::from_bits(&[true, false, true]);
        assert!(c.subsumes(&c));
    }

    #[test]
    fn subsumption_is_transitive() {
        // a = {l0=1, l1=X, l2=X}, b = {l0=1, l1=0, l2=X}, c = {l0=1, l1=0, l2=1}
        let mut a = Cube::all_x(3);
        a.set(0, Ternary::ONE);
        let mut b = Cube::all_x(3);
        b.set(0, Ternary::ONE);
        b.set(1, Ternary::ZERO);
        let c = Cube::from_bits(&[true, false, true]);

        assert!(a.subsumes(&b));
        assert!(b.subsumes(&c));
        assert!(a.subsumes(&c), "subsumption must be transitive");
    }

    #[test]
    fn all_x_subsumes_everything() {
        let tautology = Cube::all_x(4);
        let concrete = Cube::from_bits(&[true, true, false, false]);
        assert!(tautology.subsumes(&concrete));
        assert!(!concrete.subsumes(&tautology));
    }

    #[test]
    fn weaken_makes_slot_dont_care() {
        let mut c = Cube::from_bits(&[true, false]);
        c.weaken(0);
        assert!(c.get(0).is_dont_care());
        assert_eq!(c.get(1), Ternary::ZERO);
    }

    #[test]
    fn intersects_initial_respects_per_latch_initial_value() {
        // Latch 0 initializes to 1 (non-default), latch 1 initializes to 0.
        let initial = [true, false];
        let matches_init = Cube::from_bits(&[true, false]);
        let violates_init = Cube::from_bits(&[false, false]);
        let partial = {
            let mut c = Cube::all_x(2);
            c.set(1, Ternary::ZERO);
            c
        };

        assert!(matches_init.intersects_initial(&initial));
        assert!(!violates_init.intersects_initial(&initial));
        assert!(partial.intersects_initial(&initial));
    }

    #[test]
    fn all_x_cube_intersects_any_initial_state() {
        let tautology = Cube::all_x(3);
        assert!(tautology.intersects_initial(&[true, false, true]));
        assert!(tautology.intersects_initial(&[false, false, false]));
    }

    #[test]
    fn tcube_sentinels() {
        let c = Cube::all_zero(1);
        let sat = TCube::sat(c.clone());
        assert!(sat.is_null_frame());
        assert!(!sat.is_inf_frame());

        let inf = TCube::inductive_forever(c);
        assert!(inf.is_inf_frame());
        assert!(!inf.is_null_frame());
    }
}
