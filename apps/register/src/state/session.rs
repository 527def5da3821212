//! # Session State
//!
//! The invoice the cashier is typing, invoices on hold, and invoices saved
//! during this shift.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  suspend   ┌──────────┐                                   │
//! │  │  Draft   │───────────►│ Pending  │                                   │
//! │  │ (typing) │◄───────────│ (hold)   │                                   │
//! │  └────┬─────┘   resume   └──────────┘                                   │
//! │       │ save                                                            │
//! │       ▼                                                                 │
//! │  ┌──────────┐   void     ┌──────────┐                                   │
//! │  │ Archive  │───────────►│ removed  │  stock and cash returned          │
//! │  └──────────┘            └──────────┘                                   │
//! │                                                                         │
//! │  A save or a suspend always leaves a fresh blank draft behind.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use dukkan_core::invoice::{InvoiceDraft, PendingInvoices, SavedInvoice};
use dukkan_core::Money;

#[derive(Debug, Clone)]
pub struct Session {
    pub draft: InvoiceDraft,
    pub pending: PendingInvoices,
    pub archive: Vec<SavedInvoice>,
    blank_rows: usize,
    receipt_day: Option<NaiveDate>,
    receipt_seq: u32,
}

impl Session {
    pub fn new(blank_rows: usize) -> Self {
        Session {
            draft: InvoiceDraft::new(blank_rows),
            pending: PendingInvoices::new(),
            archive: Vec::new(),
            blank_rows,
            receipt_day: None,
            receipt_seq: 0,
        }
    }

    /// Swaps the draft for a blank one and returns the old draft.
    pub fn take_draft(&mut self) -> InvoiceDraft {
        std::mem::replace(&mut self.draft, InvoiceDraft::new(self.blank_rows))
    }

    /// Next receipt number, `YYMMDD-NNNN`. The counter restarts each day.
    pub fn next_receipt_number(&mut self, at: DateTime<Utc>) -> String {
        let day = at.date_naive();
        if self.receipt_day != Some(day) {
            self.receipt_day = Some(day);
            self.receipt_seq = 0;
        }
        self.receipt_seq += 1;
        format!("{}-{:04}", at.format("%y%m%d"), self.receipt_seq)
    }

    pub fn find_saved(&self, receipt_number: &str) -> Option<&SavedInvoice> {
        self.archive
            .iter()
            .find(|invoice| invoice.receipt_number == receipt_number)
    }

    /// Removes an archived invoice (void/return).
    pub fn remove_saved(&mut self, receipt_number: &str) -> Option<SavedInvoice> {
        let position = self
            .archive
            .iter()
            .position(|invoice| invoice.receipt_number == receipt_number)?;
        Some(self.archive.remove(position))
    }

    /// Grand totals of every archived invoice.
    pub fn sale_totals(&self) -> impl Iterator<Item = Money> + '_ {
        self.archive
            .iter()
            .map(|invoice| invoice.totals.total_after_discount)
    }
}

/// Register-managed session state.
#[derive(Debug)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new(blank_rows: usize) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session::new(blank_rows))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // A panic mid-command leaves plain data behind; keep serving it.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        f(&mut self.lock())
    }
}
