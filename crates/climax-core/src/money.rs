//! # Money Module
//!
//! Provides the `Money` type for monetary values in sales, reports and
//! reconciliations.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SUMMING A DAY OF SALES                                                 │
//! │                                                                         │
//! │  Floating point totals drift:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004                                     │
//! │                                                                         │
//! │  A closed day is compared against the cash drawer to the peso, so      │
//! │  every total in this crate is an exact integer sum.                    │
//! │                                                                         │
//! │  CLIMAX prices in Colombian pesos (COP), which are never split in      │
//! │  practice: 1 unit = 1 peso.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use climax_core::money::Money;
//!
//! let beer = Money::from_units(8_000);
//! let round = beer * 3u32;
//! assert_eq!(round.units(), 24_000);
//! assert_eq!(round.to_string(), "$24.000");
//! ```

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: reconciliation differences can be negative (shortage)
/// - **Tuple struct**: serializes as a bare JSON number, matching the numeric
///   `totalPrice` / `totalAmount` fields the reporting screens already read
///
/// ## Where Money Flows
/// ```text
/// Sale.totalPrice ──┬──► total_of()            ──► SalesReport.totalAmount
///                   ├──► totals_by_payment_method() ──► CashReconciliation
///                   └──► top_products()        ──► TopProduct.totalSales
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use climax_core::money::Money;
    ///
    /// let shot = Money::from_units(5_000);
    /// assert_eq!(shot.units(), 5_000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the raw amount in currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
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

    /// Returns the absolute value.
    ///
    /// Used when showing a reconciliation shortage as a positive figure.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders COP style: `$` prefix, `.` as thousands separator, no decimals.
///
/// Front-end formatting stays authoritative for the UI; this is for logs and
/// the text output of the CLI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a sale quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(i64::from(qty)))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Deserialization
// =============================================================================

/// Accepts any JSON number. Fractions round half away from zero; values
/// beyond the i64 range saturate.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in pesos")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        Ok(Money(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        Ok(Money(i64::try_from(value).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        if !value.is_finite() {
            return Err(E::custom("amount must be a finite number"));
        }
        // `as` saturates at the i64 bounds.
        Ok(Money(value.round() as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(12_500);
        assert_eq!(money.units(), 12_500);
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "$0");
        assert_eq!(Money::from_units(950).to_string(), "$950");
        assert_eq!(Money::from_units(12_500).to_string(), "$12.500");
        assert_eq!(Money::from_units(1_250_000).to_string(), "$1.250.000");
        assert_eq!(Money::from_units(-3_000).to_string(), "-$3.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(10_000);
        let b = Money::from_units(4_000);

        assert_eq!((a + b).units(), 14_000);
        assert_eq!((a - b).units(), 6_000);
        assert_eq!((b - a).units(), -6_000);
        assert_eq!((-a).units(), -10_000);
        assert_eq!((a * 3u32).units(), 30_000);
    }

    #[test]
    fn test_sum() {
        let prices = [
            Money::from_units(20),
            Money::from_units(30),
            Money::from_units(50),
        ];
        let owned: Money = prices.iter().copied().sum();
        let borrowed: Money = prices.iter().sum();
        assert_eq!(owned.units(), 100);
        assert_eq!(borrowed, owned);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_units(i64::MAX / 2 + 1);

        assert_eq!((big + big).units(), i64::MAX);
        let total: Money = [big, big, big].iter().sum();
        assert_eq!(total.units(), i64::MAX);

        let mut acc = big;
        acc += big;
        assert_eq!(acc.units(), i64::MAX);

        assert_eq!((Money::from_units(i64::MIN) - big).units(), i64::MIN);
        assert_eq!((-Money::from_units(i64::MIN)).units(), i64::MAX);
        assert_eq!((big * 4u32).units(), i64::MAX);
    }

    #[test]
    fn test_deserializes_fractional_amounts() {
        let half_up: Money = serde_json::from_str("13500.5").unwrap();
        assert_eq!(half_up.units(), 13_501);

        let down: Money = serde_json::from_str("7499.25").unwrap();
        assert_eq!(down.units(), 7_499);

        let negative: Money = serde_json::from_str("-20.5").unwrap();
        assert_eq!(negative.units(), -21);

        let huge: Money = serde_json::from_str("1e30").unwrap();
        assert_eq!(huge.units(), i64::MAX);

        let beyond_i64: Money = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(beyond_i64.units(), i64::MAX);

        assert!(serde_json::from_str::<Money>("\"5000\"").is_err());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_units(1).is_positive());
        assert!(Money::from_units(-1).is_negative());
        assert_eq!(Money::from_units(-550).abs().units(), 550);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_units(8_000)).unwrap();
        assert_eq!(json, "8000");

        let back: Money = serde_json::from_str("8000").unwrap();
        assert_eq!(back.units(), 8_000);
    }
}
