//! # Error Types
//!
//! Domain-specific error types for dukkan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dukkan-core (this file)                                               │
//! │  ├── CoreError        - business rule violations                       │
//! │  ├── ValidationError  - malformed input at the edges                   │
//! │  └── OversoldWarning  - advisory value, never returned as Err          │
//! │                                                                         │
//! │  apps/register                                                         │
//! │  └── ApiError         - what the UI sees (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every condition here is resolved by the caller: re-open the form, block
//! the transfer, or show a banner. None of them is fatal.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CoreError {
    /// A drawer entry or opening float with a non-positive amount.
    ///
    /// ## User Workflow
    /// ```text
    /// Deposit dialog: amount = 0
    ///      │
    ///      ▼
    /// record_entry(Deposit, 0.00) ──► InvalidAmount
    ///      │
    ///      ▼
    /// Dialog stays open, nothing appended
    /// ```
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: Money, reason: String },

    /// A transfer asked for more units than the source location holds.
    /// The transfer is not applied at all.
    #[error("Insufficient stock for {product_id} at {location}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        location: String,
        available: i64,
        requested: i64,
    },

    /// No stock row for the product at the given location.
    #[error("Product {product_id} not found at {location}")]
    ProductNotFound { product_id: String, location: String },

    /// Saving or suspending an invoice with no countable line.
    #[error("Invoice has no items")]
    EmptyInvoice,

    /// Saving an invoice before a paid amount was entered.
    #[error("Paid amount is required before saving")]
    PaymentRequired,

    /// A suspended invoice id that is not in the pending list.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_amount(amount: Money, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            amount,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Oversold Warning
// =============================================================================

/// A sale line took more units than the catalog had. Stock was clamped to
/// zero and the sale went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OversoldWarning {
    pub product_id: String,
    pub name: String,
    pub warehouse_id: String,
    pub available: i64,
    pub requested: i64,
}

impl OversoldWarning {
    /// Units sold that were never on the shelf.
    #[inline]
    pub fn shortfall(&self) -> i64 {
        self.requested - self.available
    }
}

impl std::fmt::Display for OversoldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Oversold {} ({}): sold {}, only {} in stock",
            self.name, self.product_id, self.requested, self.available
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
