//! Value objects: equality by value, not identity.
//!
//! `Quantity` and `Round` are small numeric values with an invariant attached;
//! they carry no identity and are freely copied.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A counted (or required) number of units. Never negative by construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Build a quantity from raw keyboard input.
    ///
    /// Every character that is not an ASCII digit is dropped first; what
    /// remains is read as a decimal number. Empty input is zero and values that
    /// do not fit saturate at `u32::MAX`. This never fails.
    pub fn from_input(raw: &str) -> Self {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self::ZERO;
        }
        Self(digits.parse().unwrap_or(u32::MAX))
    }

    pub fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.0))
    }

    /// `self - other`, floored at zero.
    pub fn shortfall_from(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_sub(other.0))
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl core::iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, Quantity::saturating_add)
    }
}

/// Ordinal counting pass. Rounds start at 1; round `n` is the visit to the
/// `n`-th location in rank order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Round(u32);

impl Round {
    pub const FIRST: Round = Round(1);

    pub fn new(value: u32) -> DomainResult<Self> {
        if value == 0 {
            return Err(DomainError::validation("round must be positive"));
        }
        Ok(Self(value))
    }

    /// Round for the location at zero-based `position` in rank order.
    pub fn for_position(position: usize) -> Self {
        let value = u32::try_from(position).unwrap_or(u32::MAX - 1);
        Self(value.saturating_add(1))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Round {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Round::new(value)
    }
}

impl From<Round> for u32 {
    fn from(value: Round) -> Self {
        value.0
    }
}

impl core::fmt::Display for Round {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
