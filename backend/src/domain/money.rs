//! Fixed-point monetary amounts.
//!
//! Balances and prices are held as integer minor units (cents) rather than
//! binary floating point, so repeated credit/debit cycles never accumulate
//! rounding drift.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Monetary amount in integer minor units (cents).
///
/// ## Invariants
/// - Arithmetic is checked; overflow surfaces as `None` instead of wrapping.
///
/// # Examples
/// ```
/// use backend::domain::Money;
///
/// let price = Money::from_minor(10_000);
/// assert_eq!(price.minor(), 10_000);
/// assert_eq!(price.to_string(), "100.00");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    ToSchema,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Construct an amount from integer minor units.
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// The amount in integer minor units.
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether the amount is negative.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction; `None` on overflow.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}
