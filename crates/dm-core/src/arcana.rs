//! Arcana values and the two reductions that produce them.
//!
//! Every derived quantity in a matrix is an [`Arcana`] in 1..=22. Two
//! distinct folding rules exist and must not be mixed:
//!
//! - [`reduce`] digit-folds: used for every point derived from a date.
//! - [`ring_sum`] / [`Arcana::ring_add`] wrap by 22: used only when merging
//!   two matrices into a compatibility matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ARCANA_MAX, ARCANA_MIN};

/// An integer in the closed range 1..=22.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Arcana(u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcanaError {
    OutOfRange(u64),
}

impl fmt::Display for ArcanaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcanaError::OutOfRange(v) => {
                write!(f, "arcana must be in {ARCANA_MIN}..={ARCANA_MAX}, got {v}")
            }
        }
    }
}

impl std::error::Error for ArcanaError {}

impl Arcana {
    pub const MIN: Arcana = Arcana(ARCANA_MIN);
    pub const MAX: Arcana = Arcana(ARCANA_MAX);

    pub fn new(value: u8) -> Result<Self, ArcanaError> {
        if (ARCANA_MIN..=ARCANA_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ArcanaError::OutOfRange(value as u64))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All 22 values in ascending order.
    pub fn all() -> impl Iterator<Item = Arcana> {
        (ARCANA_MIN..=ARCANA_MAX).map(Arcana)
    }

    /// Compatibility merge on the 1..=22 ring.
    pub fn ring_add(self, other: Self) -> Self {
        Self(ring_sum(self.0 as u32, other.0 as u32) as u8)
    }
}

impl TryFrom<u8> for Arcana {
    type Error = ArcanaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u64> for Arcana {
    type Error = ArcanaError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ArcanaError::OutOfRange(value))
            .and_then(Self::new)
    }
}

impl From<Arcana> for u8 {
    fn from(a: Arcana) -> u8 {
        a.0
    }
}

impl From<Arcana> for u64 {
    fn from(a: Arcana) -> u64 {
        a.0 as u64
    }
}

impl fmt::Display for Arcana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sum of the decimal digits of `n`.
pub fn digit_sum(mut n: u64) -> u64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Digit-reduce `n` into 1..=22.
///
/// Zero maps to 22. Anything above 22 is replaced by its digit sum until it
/// is at most 22; a value that lands in range is not folded again, so
/// `reduce(29) == 11`, not 2.
pub fn reduce(n: u64) -> Arcana {
    if n == 0 {
        return Arcana::MAX;
    }
    let mut value = n;
    while value > ARCANA_MAX as u64 {
        value = digit_sum(value);
    }
    Arcana(value as u8)
}

/// Sum arcana values and digit-reduce the total.
pub fn reduce_sum(values: &[Arcana]) -> Arcana {
    reduce(values.iter().map(|a| a.0 as u64).sum())
}

/// Ring-wrap addition used for compatibility merges.
///
/// A zero operand is treated as absent and the other operand is returned
/// unchanged. Otherwise 22 is subtracted until the sum is at most 22.
pub fn ring_sum(a: u32, b: u32) -> u32 {
    if a == 0 || b == 0 {
        return a.max(b);
    }
    let mut res = a + b;
    while res > ARCANA_MAX as u32 {
        res -= ARCANA_MAX as u32;
    }
    res
}
