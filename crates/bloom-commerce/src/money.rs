//! Money type for representing monetary values.
//!
//! The shop prices everything in Vietnamese đồng, which has no
//! subdivision: the integer amount IS the face value. Keeping amounts as
//! integers avoids the floating-point precision issues that plague
//! monetary calculations, and all arithmetic used for cart totals is
//! checked so an absurd quantity can never wrap around silently.
//!
//! On the wire a price is a bare integer (`450000`), so `Money` is
//! serde-transparent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount in Vietnamese đồng.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in đồng. VND has no minor unit.
    pub amount: i64,
}

impl Money {
    /// Create a new amount.
    pub fn new(amount: i64) -> Self {
        Self { amount }
    }

    /// The zero amount.
    pub fn zero() -> Self {
        Self { amount: 0 }
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if this is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Checked addition.
    pub fn try_add(&self, other: Money) -> Option<Money> {
        self.amount.checked_add(other.amount).map(Money::new)
    }

    /// Checked subtraction.
    pub fn try_subtract(&self, other: Money) -> Option<Money> {
        self.amount.checked_sub(other.amount).map(Money::new)
    }

    /// Checked multiplication by a quantity.
    pub fn try_multiply(&self, factor: u32) -> Option<Money> {
        self.amount.checked_mul(i64::from(factor)).map(Money::new)
    }

    /// Checked sum of an iterator of amounts.
    pub fn try_sum(iter: impl Iterator<Item = Money>) -> Option<Money> {
        let mut total = Money::zero();
        for m in iter {
            total = total.try_add(m)?;
        }
        Some(total)
    }

    /// Format for display: dot-grouped digits with the `đ` suffix,
    /// e.g. `450.000đ`.
    pub fn display(&self) -> String {
        let negative = self.amount < 0;
        let digits = self.amount.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        if negative {
            format!("-{}đ", grouped)
        } else {
            format!("{}đ", grouped)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
