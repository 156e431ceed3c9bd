//! A set of candidate digits, stored as a 9-bit mask.

use std::fmt::{self, Display};

use crate::Digit;

/// A set of pencil-mark candidates for one cell.
///
/// Bit `d - 1` is set when digit `d` is marked as a candidate. The raw mask
/// is part of the persisted-progress wire format, so [`DigitSet::bits`] and
/// [`DigitSet::try_from_bits`] expose it directly.
///
/// # Examples
///
/// ```
/// use dailoku_core::{Digit, DigitSet};
///
/// let mut set = DigitSet::EMPTY;
/// set.toggle(Digit::D4);
/// assert_eq!(set.bits(), 0b0_0000_1000);
/// assert!(set.contains(Digit::D4));
///
/// // Toggling is an involution
/// set.toggle(Digit::D4);
/// assert!(set.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DigitSet(u16);

impl DigitSet {
    /// The set containing no digits.
    pub const EMPTY: Self = Self(0);

    /// The set containing all nine digits.
    pub const FULL: Self = Self(0x1ff);

    /// Creates a set from a raw 9-bit mask, or `None` if any bit above the
    /// ninth is set.
    ///
    /// Used when validating persisted progress records.
    #[must_use]
    pub const fn try_from_bits(bits: u16) -> Option<Self> {
        if bits <= 0x1ff { Some(Self(bits)) } else { None }
    }

    /// Returns the raw 9-bit mask.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns `true` if the set contains no digits.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of digits in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` if the set contains `digit`.
    #[must_use]
    pub const fn contains(self, digit: Digit) -> bool {
        self.0 & digit.bit() != 0
    }

    /// Adds `digit` to the set.
    pub const fn insert(&mut self, digit: Digit) {
        self.0 |= digit.bit();
    }

    /// Removes `digit` from the set.
    pub const fn remove(&mut self, digit: Digit) {
        self.0 &= !digit.bit();
    }

    /// Flips membership of `digit` (XOR on the mask).
    pub const fn toggle(&mut self, digit: Digit) {
        self.0 ^= digit.bit();
    }

    /// Iterates over the digits in the set in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Digit> {
        Digit::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Digit> for DigitSet {
    fn from_iter<T: IntoIterator<Item = Digit>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for digit in iter {
            set.insert(digit);
        }
        set
    }
}

impl Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for digit in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{digit}")?;
            first = false;
        }
        write!(f, "}}")
    }
}
