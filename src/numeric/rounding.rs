// ============================================================================
// Rounding Modes and Signals
// IEEE 754-2008 rounding-direction attributes and exception flags
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rounding direction applied when a result needs more than the available digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Round to nearest, ties to the even neighbour (banker's rounding)
    #[default]
    TiesToEven,
    /// Round toward negative infinity (floor)
    TowardNegative,
    /// Round toward positive infinity (ceiling)
    TowardPositive,
    /// Round toward zero (truncate)
    TowardZero,
    /// Round to nearest, ties away from zero
    TiesToAway,
}

impl RoundingMode {
    /// Decide whether a truncated magnitude must be bumped by one unit.
    ///
    /// * `negative` - sign of the value being rounded
    /// * `odd` - whether the truncated magnitude ends in an odd digit
    /// * `half` - discarded part compared against half a unit
    /// * `discarded_nonzero` - whether anything non-zero was discarded
    pub(crate) fn rounds_up(self, negative: bool, odd: bool, half: Ordering, discarded_nonzero: bool) -> bool {
        if !discarded_nonzero {
            return false;
        }
        match self {
            RoundingMode::TiesToEven => match half {
                Ordering::Greater => true,
                Ordering::Equal => odd,
                Ordering::Less => false,
            },
            RoundingMode::TiesToAway => half != Ordering::Less,
            RoundingMode::TowardZero => false,
            RoundingMode::TowardPositive => !negative,
            RoundingMode::TowardNegative => negative,
        }
    }

    /// Whether an overflowing result of the given sign becomes infinity
    /// (as opposed to the largest finite magnitude).
    pub(crate) fn overflows_to_infinity(self, negative: bool) -> bool {
        match self {
            RoundingMode::TiesToEven | RoundingMode::TiesToAway => true,
            RoundingMode::TowardZero => false,
            RoundingMode::TowardPositive => !negative,
            RoundingMode::TowardNegative => negative,
        }
    }
}

/// Exception flags raised by a decimal operation.
///
/// Bit values match the ones commonly used by BID decimal libraries so that
/// flags can be logged and compared across systems.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signals(u8);

impl Signals {
    /// No exceptional condition
    pub const NONE: Signals = Signals(0x00);
    /// Invalid operation (e.g. Inf - Inf, 0 * Inf)
    pub const INVALID: Signals = Signals(0x01);
    /// Non-zero finite value divided by zero
    pub const DIVIDE_BY_ZERO: Signals = Signals(0x04);
    /// Result magnitude exceeded the largest finite value
    pub const OVERFLOW: Signals = Signals(0x08);
    /// Tiny result lost digits
    pub const UNDERFLOW: Signals = Signals(0x10);
    /// Result was rounded
    pub const INEXACT: Signals = Signals(0x20);

    /// Raw flag bits
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is also set in `self`.
    #[inline]
    pub const fn contains(self, other: Signals) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_inexact(self) -> bool {
        self.contains(Signals::INEXACT)
    }

    #[inline]
    pub fn insert(&mut self, other: Signals) {
        self.0 |= other.0;
    }
}

impl BitOr for Signals {
    type Output = Signals;

    #[inline]
    fn bitor(self, rhs: Signals) -> Signals {
        Signals(self.0 | rhs.0)
    }
}

impl BitOrAssign for Signals {
    #[inline]
    fn bitor_assign(&mut self, rhs: Signals) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Signals(NONE)");
        }
        let names = [
            (Signals::INVALID, "INVALID"),
            (Signals::DIVIDE_BY_ZERO, "DIVIDE_BY_ZERO"),
            (Signals::OVERFLOW, "OVERFLOW"),
            (Signals::UNDERFLOW, "UNDERFLOW"),
            (Signals::INEXACT, "INEXACT"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Signals({})", set.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_to_even() {
        let mode = RoundingMode::TiesToEven;
        assert!(!mode.rounds_up(false, false, Ordering::Equal, true));
        assert!(mode.rounds_up(false, true, Ordering::Equal, true));
        assert!(mode.rounds_up(false, false, Ordering::Greater, true));
        assert!(!mode.rounds_up(false, true, Ordering::Less, true));
    }

    #[test]
    fn test_directed_modes() {
        assert!(RoundingMode::TowardPositive.rounds_up(false, false, Ordering::Less, true));
        assert!(!RoundingMode::TowardPositive.rounds_up(true, false, Ordering::Greater, true));
        assert!(RoundingMode::TowardNegative.rounds_up(true, false, Ordering::Less, true));
        assert!(!RoundingMode::TowardZero.rounds_up(false, true, Ordering::Greater, true));
        assert!(RoundingMode::TiesToAway.rounds_up(true, false, Ordering::Equal, true));
    }

    #[test]
    fn test_exact_never_rounds() {
        for mode in [
            RoundingMode::TiesToEven,
            RoundingMode::TowardNegative,
            RoundingMode::TowardPositive,
            RoundingMode::TowardZero,
            RoundingMode::TiesToAway,
        ] {
            assert!(!mode.rounds_up(false, true, Ordering::Less, false));
            assert!(!mode.rounds_up(true, true, Ordering::Less, false));
        }
    }

    #[test]
    fn test_signals() {
        let mut s = Signals::NONE;
        assert!(s.is_empty());
        s |= Signals::INEXACT;
        s.insert(Signals::UNDERFLOW);
        assert!(s.is_inexact());
        assert!(s.contains(Signals::UNDERFLOW | Signals::INEXACT));
        assert!(!s.contains(Signals::OVERFLOW));
        assert_eq!(s.bits(), 0x30);
        assert_eq!(format!("{:?}", s), "Signals(UNDERFLOW | INEXACT)");
    }
}
