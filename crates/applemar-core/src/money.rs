//! # Money Module
//!
//! Provides the `Money` type for kwanza amounts and `TaxRate` for IVA.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    2500 × 0.14 = 350.00000000000006  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer cêntimos (1 Kz = 100 cêntimos)                   │
//! │    250000 × 1400 / 10000 = 35000 cêntimos = 350,00 Kz  ✅               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use applemar_core::money::Money;
//!
//! let price = Money::from_kwanza(1000);
//! let line = price * 2;
//! assert_eq!(line.to_string(), "2 000,00 Kz");
//!
//! let typed = Money::parse("1 500,50").unwrap();
//! assert_eq!(typed.cents(), 150050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1400 bps = 14%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

/// Angolan IVA, applied at a fixed 14%.
pub const IVA_RATE: TaxRate = TaxRate::from_bps(1400);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        IVA_RATE
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A kwanza amount in cêntimos.
///
/// ## Design Decisions
/// - **i64 (signed)**: balances and negative stock valuations go below zero
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as the raw cêntimo count** in the stored collections
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cêntimos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole kwanza.
    ///
    /// ```rust
    /// use applemar_core::money::Money;
    ///
    /// assert_eq!(Money::from_kwanza(1000).cents(), 100_000);
    /// ```
    #[inline]
    pub const fn from_kwanza(kz: i64) -> Self {
        Money(kz * 100)
    }

    /// Returns the value in cêntimos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-kwanza portion (truncated toward zero).
    #[inline]
    pub const fn kwanza(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cêntimo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount, rounding half up to the cêntimo.
    ///
    /// Integer math: `(amount × bps + 5000) / 10000`, widened to i128 so
    /// large ledgers cannot overflow.
    ///
    /// ```rust
    /// use applemar_core::money::{Money, IVA_RATE};
    ///
    /// // 2 500 Kz × 14% = 350 Kz
    /// assert_eq!(Money::from_kwanza(2500).calculate_tax(IVA_RATE).cents(), 35000);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Ratio of this amount to `other`, as a float (for percentages only).
    ///
    /// Returns `None` when `other` is zero.
    pub fn ratio_to(&self, other: Money) -> Option<f64> {
        if other.is_zero() {
            return None;
        }
        Some(self.0 as f64 / other.0 as f64)
    }

    /// Parses an amount typed by the operator.
    ///
    /// ## Accepted Forms
    /// - `"1500"`, `"1500.5"`, `"1500.50"` (dot decimal)
    /// - `"1 500,50"`, `"1.500,50"` (pt-AO: comma decimal, dot/space grouping)
    /// - optional leading `-` and optional trailing `Kz`
    ///
    /// At most two decimal places are allowed; anything else is rejected
    /// instead of silently becoming NaN.
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let mut text = input.trim();
        if let Some(stripped) = text.strip_suffix("Kz") {
            text = stripped.trim_end();
        }
        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, text),
        };

        let cleaned: String = if text.contains(',') {
            text.chars()
                .filter(|c| *c != '.' && !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect()
        } else {
            text.chars().filter(|c| !c.is_whitespace()).collect()
        };

        let mut parts = cleaned.splitn(2, '.');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("not a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("not a number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("not a number"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("not a number"))?,
        };

        let cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_value))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// pt-AO display: `"1 234 567,89 Kz"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.kwanza().abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }

        write!(f, "{}{},{:02} Kz", sign, grouped, self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
