//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  An invoice of 11 lines at 0.15 VAT drifts by fractions of a halala    │
//! │  on every keystroke.                                                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer halalas (1 SAR = 100 halalas)                    │
//! │    115.00 SAR  ──►  11500                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Form fields arrive as raw strings. They are parsed with
//! [`Money::parse_lenient`], which never fails: blank or garbage input is zero.
//!
//! ## Usage
//! ```rust
//! use dukkan_core::money::Money;
//!
//! let price = Money::from_halalas(1099); // 10.99
//! let doubled = price * 2;               // 21.98
//! assert_eq!(doubled.halalas(), 2198);
//!
//! assert_eq!(Money::parse_lenient("12.5").halalas(), 1250);
//! assert_eq!(Money::parse_lenient("abc").halalas(), 0);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::TaxRate;

/// Minor units per major unit (halalas per riyal).
const MINOR_PER_MAJOR: i64 = 100;

/// Largest amount a form field can hold: 1,000,000,000.00. Larger input is
/// clamped to it, as is its negative.
pub const MAX_FORM_AMOUNT: Money = Money(100_000_000_000);

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (halalas for SAR).
///
/// Signed: a discount larger than the invoice legitimately produces a
/// negative grand total, and the drawer can be overdrawn on paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from halalas.
    #[inline]
    pub const fn from_halalas(halalas: i64) -> Self {
        Money(halalas)
    }

    /// Creates a Money value from riyals and halalas.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).halalas(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).halalas(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Parses a raw form field into Money without ever failing.
    ///
    /// ## Coercion Rules
    /// ```text
    /// ""        → 0.00      (blank field)
    /// "abc"     → 0.00      (non-numeric)
    /// " 12.5 "  → 12.50
    /// "1,250"   → 1250.00   (thousands separators dropped)
    /// "٣٠"      → 30.00     (Arabic-Indic digits)
    /// "0.125"   → 0.13      (rounded half away from zero)
    /// "-5"      → -5.00     (sign kept; callers clamp if needed)
    /// "99999999999999" → 1000000000.00 (clamped to MAX_FORM_AMOUNT)
    /// ```
    pub fn parse_lenient(raw: &str) -> Money {
        let Some(value) = parse_decimal(raw) else {
            return Money::zero();
        };

        // Clamp in riyals so the scale-up below cannot overflow the decimal.
        let limit = Decimal::from(MAX_FORM_AMOUNT.riyals());
        let riyals = value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .clamp(-limit, limit);

        (riyals * Decimal::from(MINOR_PER_MAJOR))
            .to_i64()
            .map(Money)
            .unwrap_or_default()
    }

    /// Returns the value in halalas.
    #[inline]
    pub const fn halalas(&self) -> i64 {
        self.0
    }

    /// Whole riyals, truncated toward zero.
    #[inline]
    pub const fn riyals(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// The halala part (always 0-99).
    #[inline]
    pub const fn halalas_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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
        Money(self.0.saturating_abs())
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Calculates VAT on this amount, rounded half-up to the halala.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. Negative amounts round
    /// symmetrically so `-x` always taxes to `-(tax of x)`.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::Money;
    /// use dukkan_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_halalas(10_000); // 100.00
    /// let vat = subtotal.calculate_tax(TaxRate::from_bps(1500));
    /// assert_eq!(vat.halalas(), 1_500); // 15.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        let tax = if self.0 < 0 { -magnitude } else { magnitude };
        Money(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Divides by a unit count, rounding half-up to the halala.
    ///
    /// Returns zero for a zero divisor, the same answer an empty carton
    /// field gives on the form.
    pub fn divide_by(&self, units: i64) -> Money {
        if units == 0 {
            return Money::zero();
        }
        let value = Decimal::from(self.0) / Decimal::from(units);
        value
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
            .unwrap_or_default()
    }

    /// Formats as a plain two-decimal number (`1234.50`), the way amounts are
    /// shown next to the currency label on invoices.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.riyals().abs(), self.halalas_part())
    }
}

/// Normalises a form value and parses it as a decimal.
///
/// Arabic-Indic digits and the Arabic decimal separator are mapped to ASCII,
/// thousands separators are dropped.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let normalised: String = raw
        .trim()
        .chars()
        .filter_map(|c| match c {
            '٠'..='٩' => char::from_digit(c as u32 - '٠' as u32, 10),
            '٫' => Some('.'),
            ',' | '٬' | ' ' => None,
            other => Some(other),
        })
        .collect();

    if normalised.is_empty() {
        return None;
    }

    Decimal::from_str(&normalised).ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates instead of overflowing. Totals are recomputed on every
// keystroke and must never panic on what was typed.

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
