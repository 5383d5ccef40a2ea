//! Integer minor-unit money

use std::fmt;

use serde::{Deserialize, Serialize};

/// Amount in currency minor units (e.g. cents)
///
/// Payout math never touches floating point; `i128` is used for
/// intermediate products and narrowed back with a checked conversion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create from minor units
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Minor units
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Is this an exact multiple of `increment`? (`increment` must be positive)
    pub fn is_multiple_of(self, increment: Money) -> bool {
        increment.0 > 0 && self.0 % increment.0 == 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Money> {
        let factor = i64::try_from(factor).ok()?;
        self.0.checked_mul(factor).map(Money)
    }

    /// `self * numerator / denominator` with floor division, computed in i128
    pub fn checked_scale(self, numerator: u128, denominator: u64) -> Option<Money> {
        if denominator == 0 {
            return None;
        }
        let numerator = i128::try_from(numerator).ok()?;
        let product = i128::from(self.0).checked_mul(numerator)?;
        let scaled = product.div_euclid(i128::from(denominator));
        i64::try_from(scaled).ok().map(Money)
    }

    /// Ratio to another amount, for reporting only
    pub fn ratio_to(self, other: Money) -> f64 {
        if other.0 == 0 {
            0.0
        } else {
            self.0 as f64 / other.0 as f64
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
