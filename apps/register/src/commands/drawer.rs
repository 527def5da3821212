//! # Drawer Commands
//!
//! Commands behind the cash-box screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cash Box                                    Balance: 1300.00 ريال      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  [ إيداع ]  [ سحب ]                 from [2025-06-01] to [2025-06-30]    │
//! │                                                                         │
//! │  2025-06-02  withdrawal   200.00   Office supplies                      │
//! │  2025-06-01  deposit      500.00   Initial deposit                      │
//! │                                                                         │
//! │  deposits 500.00 • withdrawals 200.00 • net 300.00                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use dukkan_core::ledger::{RangeSummary, ShiftSummary};
use dukkan_core::{EntryKind, LedgerEntry, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DrawerState, SessionState};

/// Form payload of the deposit / withdrawal dialogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    /// Raw amount field
    pub amount: String,
    pub description: String,
    #[serde(default)]
    pub related_document: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub entry: LedgerEntry,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerReport {
    pub summary: RangeSummary,
    /// Newest first
    pub entries: Vec<LedgerEntry>,
    pub balance: Money,
}

fn record(drawer: &DrawerState, kind: EntryKind, request: &EntryRequest) -> Result<EntryResponse, ApiError> {
    let amount = Money::parse_lenient(&request.amount);
    drawer.with_ledger_mut(|ledger| {
        let entry = ledger.record_entry(
            kind,
            amount,
            &request.description,
            request.related_document.as_deref(),
        )?;
        let balance = ledger.current_balance();
        info!(kind = %kind, amount = %amount, balance = %balance, "Drawer updated");
        Ok(EntryResponse { entry, balance })
    })
}

pub fn deposit(drawer: &DrawerState, request: EntryRequest) -> Result<EntryResponse, ApiError> {
    debug!(amount = %request.amount, "deposit command");
    record(drawer, EntryKind::Deposit, &request)
}

pub fn withdraw(drawer: &DrawerState, request: EntryRequest) -> Result<EntryResponse, ApiError> {
    debug!(amount = %request.amount, "withdraw command");
    record(drawer, EntryKind::Withdrawal, &request)
}

pub fn get_balance(drawer: &DrawerState) -> Money {
    drawer.with_ledger(|ledger| ledger.current_balance())
}

/// Totals and entries between two dates, inclusive. A missing bound
/// selects everything.
pub fn drawer_report(drawer: &DrawerState, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DrawerReport {
    debug!(?start, ?end, "drawer_report command");
    drawer.with_ledger(|ledger| {
        let mut entries: Vec<LedgerEntry> = ledger.entries_in_range(start, end).into_iter().cloned().collect();
        entries.reverse();
        DrawerReport {
            summary: ledger.balance_in_range(start, end),
            entries,
            balance: ledger.current_balance(),
        }
    })
}

pub fn set_opening_float(drawer: &DrawerState, raw: &str) -> Result<Money, ApiError> {
    let amount = Money::parse_lenient(raw);
    debug!(amount = %amount, "set_opening_float command");
    drawer.with_ledger_mut(|ledger| {
        ledger.set_opening_float(amount)?;
        info!(opening_float = %amount, "Opening float set");
        Ok(ledger.current_balance())
    })
}

/// Opening float plus the grand totals of this shift's invoices.
pub fn shift_summary(session: &SessionState, drawer: &DrawerState) -> ShiftSummary {
    debug!("shift_summary command");
    let opening_float = drawer.with_ledger(|ledger| ledger.opening_float());
    session.with_session(|s| ShiftSummary::new(opening_float, s.sale_totals()))
}
