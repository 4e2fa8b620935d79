//! Type-safe price representation using decimal arithmetic.
//!
//! All monetary values in Balcao are Brazilian reais. Prices use
//! `rust_decimal::Decimal` so that totals, discounts and shipping
//! multipliers never accumulate binary floating-point error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Brazilian reais (BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from centavos (e.g., 1999 => R$ 19,99).
    #[must_use]
    pub fn from_centavos(centavos: i64) -> Self {
        Self(Decimal::new(centavos, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "R$ 19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0 * rhs)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}
