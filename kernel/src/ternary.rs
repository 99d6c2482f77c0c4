//! `Ternary`: the three-valued logic domain {0, 1, X}.
//!
//! # Encoding
//!
//! A `Ternary` is a `(bit, dont_care)` pair packed into a single byte, the
//! same two-bit-datum shape as the original PDR engine's `Value3` (see
//! `examples/original_source/pdr/PDRDef.h`): `dont_care` set means the value
//! is X regardless of `bit`.
//!
//! # Semantics
//!
//! Standard Kleene three-valued logic:
//!
//! - `X & 0 = 0`, `X & 1 = X`, `X & X = X`
//! - `X | 1 = 1`, `X | 0 = X`, `X | X = X`
//! - `~X = X`
//! - Equality treats any two X as equal, regardless of `bit`.
//!
//! All operations are total, allocation-free, and `const`-friendly where
//! the language allows.

use std::fmt;

/// A single three-valued datum: 0, 1, or X ("don't care").
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ternary {
    bit: bool,
    dont_care: bool,
}

impl Ternary {
    /// The concrete value 0.
    pub const ZERO: Self = Self {
        bit: false,
        dont_care: false,
    };

    /// The concrete value 1.
    pub const ONE: Self = Self {
        bit: true,
        dont_care: false,
    };

    /// The don't-care value X.
    pub const X: Self = Self {
        bit: false,
        dont_care: true,
    };

    /// Construct from a concrete boolean (never X).
    #[must_use]
    pub const fn from_bool(b: bool) -> Self {
        Self {
            bit: b,
            dont_care: false,
        }
    }

    /// True if this value is X (don't care).
    #[must_use]
    pub const fn is_dont_care(self) -> bool {
        self.dont_care
    }

    /// The underlying bit. Meaningless when [`is_dont_care`](Self::is_dont_care) is true,
    /// but always readable (no panic) to keep the type allocation-free and total.
    #[must_use]
    pub const fn bit(self) -> bool {
        self.bit
    }

    /// Read this value as a concrete boolean. Returns `None` if it is X.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        if self.dont_care {
            None
        } else {
            Some(self.bit)
        }
    }

    /// Ternary conjunction (Kleene AND).
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        if (!self.dont_care && !self.bit) || (!other.dont_care && !other.bit) {
            Self::ZERO
        } else if self.dont_care || other.dont_care {
            Self::X
        } else {
            Self::ONE
        }
    }

    /// Ternary disjunction (Kleene OR).
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        if (!self.dont_care && self.bit) || (!other.dont_care && other.bit) {
            Self::ONE
        } else if self.dont_care || other.dont_care {
            Self::X
        } else {
            Self::ZERO
        }
    }

    /// Ternary negation.
    #[must_use]
    pub const fn not(self) -> Self {
        if self.dont_care {
            Self::X
        } else {
            Self::from_bool(!self.bit)
        }
    }

    /// Fast path: ternary AND with a concrete boolean, avoiding the
    /// round-trip through [`Self::from_bool`].
    #[must_use]
    pub const fn and_bool(self, other: bool) -> Self {
        if !other {
            Self::ZERO
        } else if self.dont_care {
            Self::X
        } else {
            Self::from_bool(self.bit)
        }
    }

    /// Fast path: ternary OR with a concrete boolean.
    #[must_use]
    pub const fn or_bool(self, other: bool) -> Self {
        if other {
            Self::ONE
        } else if self.dont_care {
            Self::X
        } else {
            Self::from_bool(self.bit)
        }
    }

    /// Ternary equality: two X values are always equal; otherwise compares bits.
    #[must_use]
    pub const fn ternary_eq(self, other: Self) -> bool {
        if self.dont_care != other.dont_care {
            false
        } else if self.dont_care {
            true
        } else {
            self.bit == other.bit
        }
    }
}

impl fmt::Debug for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dont_care {
            write!(f, "X")
        } else if self.bit {
            write!(f, "1")
        } else {
            write!(f, "0")
        }
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<bool> for Ternary {
    fn from(b: bool) -> Self {
        Self::from_bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_absorption_laws() {
        assert!(Ternary::ZERO.and(Ternary::X).ternary_eq(Ternary::ZERO));
        assert!(Ternary::ONE.and(Ternary::X).ternary_eq(Ternary::X));
        assert!(Ternary::X.and(Ternary::X).ternary_eq(Ternary::X));
    }

    #[test]
    fn or_absorption_laws() {
        assert!(Ternary::ONE.or(Ternary::X).ternary_eq(Ternary::ONE));
        assert!(Ternary::ZERO.or(Ternary::X).ternary_eq(Ternary::X));
        assert!(Ternary::X.or(Ternary::X).ternary_eq(Ternary::X));
    }

    #[test]
    fn not_x_is_x() {
        assert!(Ternary::X.not().ternary_eq(Ternary::X));
        assert_eq!(Ternary::ONE.not(), Ternary::ZERO);
        assert_eq!(Ternary::ZERO.not(), Ternary::ONE);
    }

    #[test]
    fn de_morgan_holds_over_concrete_values() {
        for a in [Ternary::ZERO, Ternary::ONE, Ternary::X] {
            for b in [Ternary::ZERO, Ternary::ONE, Ternary::X] {
                let lhs = a.and(b).not();
                let rhs = a.not().or(b.not());
                assert!(
                    lhs.ternary_eq(rhs),
                    "de Morgan failed for ({a:?}, {b:?}): ~({a:?}&{b:?})={lhs:?} vs {rhs:?}"
                );
            }
        }
    }

    #[test]
    fn equality_treats_any_two_x_as_equal() {
        let x1 = Ternary::X;
        let mut x2 = Ternary::X;
        // Flip the underlying bit field directly via and/or identities —
        // dont_care stays set, bit is irrelevant.
        x2 = x2.or(Ternary::ONE).and(Ternary::X);
        assert!(x1.ternary_eq(x2));
    }

    #[test]
    fn as_bool_round_trips_concrete_values() {
        assert_eq!(Ternary::ZERO.as_bool(), Some(false));
        assert_eq!(Ternary::ONE.as_bool(), Some(true));
        assert_eq!(Ternary::X.as_bool(), None);
    }

    #[test]
    fn bool_fast_paths_match_general_form() {
        for bit in [false, true] {
            for other in [false, true] {
                assert_eq!(
                    Ternary::from_bool(bit).and_bool(other),
                    Ternary::from_bool(bit).and(Ternary::from_bool(other))
                );
                assert_eq!(
                    Ternary::from_bool(bit).or_bool(other),
                    Ternary::from_bool(bit).or(Ternary::from_bool(other))
                );
            }
        }
        assert!(Ternary::X.and_bool(false).ternary_eq(Ternary::ZERO));
        assert!(Ternary::X.and_bool(true).ternary_eq(Ternary::X));
        assert!(Ternary::X.or_bool(true).ternary_eq(Ternary::ONE));
        assert!(Ternary::X.or_bool(false).ternary_eq(Ternary::X));
    }

    #[test]
    fn debug_format_is_0_1_x() {
        assert_eq!(format!("{:?}", Ternary::ZERO), "0");
        assert_eq!(format!("{:?}", Ternary::ONE), "1");
        assert_eq!(format!("{:?}", Ternary::X), "X");
    }
}
