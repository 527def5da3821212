//! # Cash Drawer Ledger
//!
//! The drawer balance is never stored; it is the fold of an append-only list
//! of entries over the opening float.
//!
//! ## Balance Fold
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  opening float 1000.00                                                  │
//! │       │                                                                 │
//! │       ├── + deposit     500.00   "Initial deposit"                      │
//! │       ├── − withdrawal  200.00   "Office supplies"                      │
//! │       └── + deposit      86.25   "Invoice payment"  INV 250601-0001     │
//! │                                                                         │
//! │  current balance = 1386.25                                              │
//! │                                                                         │
//! │  Folded in insertion order; shown newest first.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{EntryKind, LedgerEntry};
use crate::validation::{normalize_document_ref, validate_description};

/// Description used for deposits made by the point-of-sale save path.
pub const SALE_PAYMENT_DESCRIPTION: &str = "Invoice payment";

/// Totals over a date range of the drawer report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RangeSummary {
    pub deposits: Money,
    pub withdrawals: Money,
    /// `deposits − withdrawals`; the opening float is not included.
    pub net: Money,
}

/// End-of-shift view of the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShiftSummary {
    pub opening_float: Money,
    pub total_sales: Money,
    pub end_of_shift_total: Money,
}

impl ShiftSummary {
    pub fn new(opening_float: Money, sale_totals: impl IntoIterator<Item = Money>) -> Self {
        let total_sales: Money = sale_totals.into_iter().sum();
        ShiftSummary {
            opening_float,
            total_sales,
            end_of_shift_total: opening_float + total_sales,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashDrawerLedger {
    opening_float: Money,
    entries: Vec<LedgerEntry>,
}

impl CashDrawerLedger {
    pub fn new(opening_float: Money) -> Self {
        CashDrawerLedger {
            opening_float: opening_float.non_negative(),
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn opening_float(&self) -> Money {
        self.opening_float
    }

    /// Sets the cash placed in the drawer before the first sale.
    pub fn set_opening_float(&mut self, amount: Money) -> CoreResult<()> {
        if amount.is_negative() {
            return Err(CoreError::invalid_amount(amount, "opening float cannot be negative"));
        }
        self.opening_float = amount;
        Ok(())
    }

    /// Appends an entry stamped with the current time.
    pub fn record_entry(
        &mut self,
        kind: EntryKind,
        amount: Money,
        description: &str,
        related_document: Option<&str>,
    ) -> CoreResult<LedgerEntry> {
        self.record_entry_at(kind, amount, description, related_document, Utc::now())
    }

    /// Appends an entry with an explicit timestamp.
    ///
    /// ## Errors
    /// - `InvalidAmount` for a zero or negative amount
    /// - `Validation` for a blank description or an over-long document ref
    ///
    /// On error nothing is appended.
    pub fn record_entry_at(
        &mut self,
        kind: EntryKind,
        amount: Money,
        description: &str,
        related_document: Option<&str>,
        at: DateTime<Utc>,
    ) -> CoreResult<LedgerEntry> {
        if !amount.is_positive() {
            return Err(CoreError::invalid_amount(amount, "drawer entries must be positive"));
        }
        validate_description(description)?;
        let related_document = normalize_document_ref(related_document)?;

        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            description: description.trim().to_string(),
            recorded_at: at,
            related_document,
        };
        self.entries.push(entry.clone());

        debug!(entry_id = %entry.id, kind = %kind, amount = %amount, "Drawer entry recorded");
        Ok(entry)
    }

    /// Deposits the cash taken for an invoice.
    pub fn record_sale_payment(&mut self, amount: Money, invoice_id: &str) -> CoreResult<LedgerEntry> {
        self.record_entry(
            EntryKind::Deposit,
            amount,
            SALE_PAYMENT_DESCRIPTION,
            Some(invoice_id),
        )
    }

    /// Opening float plus every deposit minus every withdrawal.
    pub fn current_balance(&self) -> Money {
        self.entries
            .iter()
            .fold(self.opening_float, |balance, entry| balance + entry.signed_amount())
    }

    /// Entries dated within `[start, end]`, or all entries when either bound
    /// is missing. Insertion order.
    pub fn entries_in_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<&LedgerEntry> {
        match (start, end) {
            (Some(start), Some(end)) => self
                .entries
                .iter()
                .filter(|entry| entry.date() >= start && entry.date() <= end)
                .collect(),
            _ => self.entries.iter().collect(),
        }
    }

    pub fn balance_in_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> RangeSummary {
        let mut summary = RangeSummary::default();
        for entry in self.entries_in_range(start, end) {
            match entry.kind {
                EntryKind::Deposit => summary.deposits += entry.amount,
                EntryKind::Withdrawal => summary.withdrawals += entry.amount,
            }
        }
        summary.net = summary.deposits - summary.withdrawals;
        summary
    }

    /// Display order: newest first.
    pub fn entries_recent_first(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
