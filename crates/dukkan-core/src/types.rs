//! # Domain Types
//!
//! Core domain types used throughout Dukkan POS.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ LineItemInput   │──►│    LineItem     │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  name           │   │  id             │       │
//! │  │  quantity (str) │   │  quantity (i64) │   │  name           │       │
//! │  │  unit_price(str)│   │  unit_price     │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   │  price          │       │
//! │                                              │  warehouse_id   │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────┘       │
//! │  │    TaxRate      │   │  LedgerEntry    │                             │
//! │  │  bps (u32)      │   │  kind, amount   │                             │
//! │  │  1500 = 15%     │   │  recorded_at    │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Rows
//! A `Product` row is the stock of one product at one location. A product
//! kept both in the main warehouse and on the shop floor appears twice with
//! the same `id` and different `warehouse_id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{parse_decimal, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// VAT rate in basis points (1 bps = 0.01%). 1500 bps = 15%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (15.0 → 1500 bps).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

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
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_VAT_RATE_BPS)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// One row of the invoice form exactly as typed by the cashier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemInput {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
}

impl LineItemInput {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, unit_price: impl Into<String>) -> Self {
        LineItemInput {
            name: name.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }

    /// Blank row used to pad a fresh form.
    pub fn blank() -> Self {
        LineItemInput::default()
    }
}

/// A typed invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Coerces a raw form row. Blank, non-numeric or negative fields become 0.
    pub fn from_input(input: &LineItemInput) -> Self {
        LineItem {
            name: input.name.trim().to_string(),
            quantity: parse_quantity_lenient(&input.quantity),
            unit_price: Money::parse_lenient(&input.unit_price).non_negative(),
        }
    }

    /// Whether this line enters the invoice totals.
    ///
    /// All three of name, quantity and unit price must be filled; a row with
    /// only some of them is still being typed.
    pub fn is_countable(&self) -> bool {
        !self.name.trim().is_empty() && self.quantity > 0 && self.unit_price.is_positive()
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Largest quantity a single invoice line can hold. Larger input is clamped.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Parses a quantity field. Whole units only: fractions truncate toward zero,
/// blank, non-numeric or negative input becomes 0, and anything above
/// [`MAX_LINE_QUANTITY`] is clamped to it.
pub fn parse_quantity_lenient(raw: &str) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;

    parse_decimal(raw)
        .map(|value| value.trunc().clamp(Decimal::ZERO, Decimal::from(MAX_LINE_QUANTITY)))
        .and_then(|qty| qty.to_i64())
        .unwrap_or(0)
}

/// Unit price of a product sold by the carton.
///
/// ## Example
/// ```rust
/// use dukkan_core::types::unit_price_from_carton;
/// use dukkan_core::Money;
///
/// // 24.00 for a carton of 12
/// let unit = unit_price_from_carton(Money::from_halalas(2400), 12);
/// assert_eq!(unit.halalas(), 200);
/// ```
pub fn unit_price_from_carton(price_per_carton: Money, units_per_carton: i64) -> Money {
    if units_per_carton <= 0 || !price_per_carton.is_positive() {
        return Money::zero();
    }
    price_per_carton.divide_by(units_per_carton)
}

// =============================================================================
// Product
// =============================================================================

/// Stock of one product at one location, as served by `/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Units on hand at `warehouse_id`. Never negative after an adjustment.
    pub quantity: i64,
    pub price: Money,
    pub warehouse_id: String,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        price: Money,
        warehouse_id: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
            warehouse_id: warehouse_id.into(),
        }
    }

    /// Whether this row holds `product_id` at `location`.
    #[inline]
    pub fn is_stock_row(&self, product_id: &str, location: &str) -> bool {
        self.id == product_id && self.warehouse_id == location
    }
}

// =============================================================================
// Cash Drawer Entries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntryKind {
    Deposit,
    Withdrawal,
}

impl EntryKind {
    /// The amount with the sign it contributes to the balance.
    #[inline]
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            EntryKind::Deposit => amount,
            EntryKind::Withdrawal => -amount,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Deposit => write!(f, "deposit"),
            EntryKind::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" | "إيداع" => Ok(EntryKind::Deposit),
            "withdrawal" | "سحب" => Ok(EntryKind::Withdrawal),
            other => Err(format!("unknown entry kind: {}", other)),
        }
    }
}

/// One movement of cash in or out of the drawer. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerEntry {
    pub id: String,
    pub kind: EntryKind,
    /// Always positive; direction comes from `kind`.
    pub amount: Money,
    pub description: String,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
    /// Invoice or voucher number this movement belongs to.
    pub related_document: Option<String>,
}

impl LedgerEntry {
    /// Calendar date used by report ranges.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }

    #[inline]
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
