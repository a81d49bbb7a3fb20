use std::{
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Add, Mul},
};

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Mass;

impl Mass {
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn round_dp(self, decimal_points: u32) -> Self {
        Self(self.0.round_dp(decimal_points))
    }

    /// Adds two masses, returning `None` if the sum is too large for a `Decimal`
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Multiplies a mass by an atom count, returning `None` if the product is too large for a `Decimal`
    #[must_use]
    pub fn checked_mul(self, count: u64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(count)).map(Self)
    }

    // NOTE: Every `Decimal` fits in an `f64` (perhaps losing some precision), so this never actually falls back
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl Display for Mass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Add for Mass {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u64> for Mass {
    type Output = Self;

    fn mul(self, rhs: u64) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Mass {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<Mass> for Decimal {
    fn from(value: Mass) -> Self {
        value.0
    }
}
