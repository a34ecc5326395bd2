//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API sends prices as bare JSON numbers in Thai baht, so
//! [`Price`] serializes as a number rather than the string form
//! `rust_decimal` uses by default.

use std::fmt;
use std::iter::Sum;
use std::ops::Mul;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol appended when formatting prices for display.
pub const CURRENCY_SYMBOL: &str = "฿";

/// A catalog price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero baht.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of baht.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "129 ฿").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {CURRENCY_SYMBOL}", self.0.normalize())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Saturates at the decimal range instead of panicking.
impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

/// Saturates at the decimal range instead of panicking.
impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| Self(acc.0.saturating_add(p.0)))
    }
}
