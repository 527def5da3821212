//! # Invoice Commands
//!
//! Commands behind the cash-invoice screen.
//!
//! ## Save Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  save_invoice()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. draft.finalize()          EmptyInvoice / PaymentRequired → stop     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. receipt number            YYMMDD-NNNN                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. drawer deposit            paid − change, skipped when zero          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. stock deduction           by name, oversold → warning               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. archive + blank draft                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use dukkan_core::inventory::{apply_sale_deduction, apply_sale_return};
use dukkan_core::invoice::{InvoiceDraft, InvoiceTotals, SavedInvoice};
use dukkan_core::{EntryKind, LineItemInput, Money, OversoldWarning};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{CatalogState, DrawerState, RegisterConfig, Session, SessionState};

/// Description of the drawer withdrawal made when an invoice is voided.
pub const VOID_REFUND_DESCRIPTION: &str = "Invoice return";

/// The invoice form with its live totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub draft: InvoiceDraft,
    pub totals: InvoiceTotals,
}

impl InvoiceView {
    fn of(session: &Session, config: &RegisterConfig) -> Self {
        InvoiceView {
            draft: session.draft.clone(),
            totals: session.draft.totals(&config.calculator()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub invoice: SavedInvoice,
    pub warnings: Vec<OversoldWarning>,
    pub change_due: Money,
    pub drawer_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSummary {
    pub id: String,
    pub item_count: usize,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidResponse {
    pub invoice: SavedInvoice,
    pub refunded: Money,
    pub drawer_balance: Money,
}

// =============================================================================
// Editing
// =============================================================================

pub fn get_invoice(session: &SessionState, config: &RegisterConfig) -> InvoiceView {
    debug!("get_invoice command");
    session.with_session(|s| InvoiceView::of(s, config))
}

/// Totals only, recomputed from the current rows.
pub fn get_totals(session: &SessionState, config: &RegisterConfig) -> InvoiceTotals {
    debug!("get_totals command");
    session.with_session(|s| s.draft.totals(&config.calculator()))
}

/// Replaces one row of the form with what the cashier typed.
pub fn update_line(
    session: &SessionState,
    config: &RegisterConfig,
    index: usize,
    input: LineItemInput,
) -> Result<InvoiceView, ApiError> {
    debug!(index, name = %input.name, "update_line command");
    session.with_session_mut(|s| {
        s.draft.update_row(index, input)?;
        Ok(InvoiceView::of(s, config))
    })
}

pub fn set_discount(session: &SessionState, config: &RegisterConfig, raw: &str) -> InvoiceView {
    debug!(raw, "set_discount command");
    session.with_session_mut(|s| {
        s.draft.set_discount(raw);
        InvoiceView::of(s, config)
    })
}

pub fn set_paid(session: &SessionState, config: &RegisterConfig, raw: &str) -> InvoiceView {
    debug!(raw, "set_paid command");
    session.with_session_mut(|s| {
        s.draft.set_paid(raw);
        InvoiceView::of(s, config)
    })
}

/// Throws the current form away.
pub fn clear_invoice(session: &SessionState, config: &RegisterConfig) -> InvoiceView {
    debug!("clear_invoice command");
    session.with_session_mut(|s| {
        s.take_draft();
        InvoiceView::of(s, config)
    })
}

// =============================================================================
// Save / Void
// =============================================================================

/// Saves the current invoice.
///
/// Nothing changes when the draft cannot be finalized. Otherwise the drawer,
/// the catalog and the archive are all updated before the lock is released.
pub fn save_invoice(
    session: &SessionState,
    drawer: &DrawerState,
    catalog: &CatalogState,
    config: &RegisterConfig,
) -> Result<SaveResponse, ApiError> {
    debug!("save_invoice command");

    session.with_session_mut(|s| {
        let (items, totals) = s.draft.finalize(&config.calculator())?;

        let saved_at = Utc::now();
        let receipt_number = s.next_receipt_number(saved_at);

        // Stock deduction cannot fail, so the drawer goes first.
        let cash = totals.cash_retained();
        let drawer_balance = drawer.with_ledger_mut(|ledger| {
            if cash.is_positive() {
                ledger.record_sale_payment(cash, &receipt_number)?;
            }
            Ok::<_, ApiError>(ledger.current_balance())
        })?;

        let deduction = catalog.with_catalog_mut(|products| apply_sale_deduction(products, &items));

        let draft = s.take_draft();
        let invoice = SavedInvoice {
            id: draft
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            receipt_number,
            issued_on: saved_at.date_naive(),
            items,
            totals,
            saved_at,
        };
        s.archive.push(invoice.clone());

        info!(
            receipt = %invoice.receipt_number,
            total = %totals.total_after_discount,
            cash = %cash,
            oversold = deduction.warnings.len(),
            "Invoice saved"
        );

        Ok(SaveResponse {
            invoice,
            warnings: deduction.warnings,
            change_due: totals.change_due(),
            drawer_balance,
        })
    })
}

/// Voids an archived invoice: its items go back on the shelf and the cash
/// it brought in leaves the drawer.
pub fn void_invoice(
    session: &SessionState,
    drawer: &DrawerState,
    catalog: &CatalogState,
    receipt_number: &str,
) -> Result<VoidResponse, ApiError> {
    debug!(receipt = %receipt_number, "void_invoice command");

    session.with_session_mut(|s| {
        let refunded = s
            .find_saved(receipt_number)
            .map(|invoice| invoice.totals.cash_retained())
            .ok_or_else(|| ApiError::not_found("Invoice", receipt_number))?;

        let drawer_balance = drawer.with_ledger_mut(|ledger| {
            if refunded.is_positive() {
                ledger.record_entry(
                    EntryKind::Withdrawal,
                    refunded,
                    VOID_REFUND_DESCRIPTION,
                    Some(receipt_number),
                )?;
            }
            Ok::<_, ApiError>(ledger.current_balance())
        })?;

        let invoice = s
            .remove_saved(receipt_number)
            .ok_or_else(|| ApiError::not_found("Invoice", receipt_number))?;
        catalog.with_catalog_mut(|products| apply_sale_return(products, &invoice.items));

        info!(receipt = %receipt_number, refunded = %refunded, "Invoice voided");

        Ok(VoidResponse {
            invoice,
            refunded,
            drawer_balance,
        })
    })
}

/// Invoices saved this shift, newest first.
pub fn list_archive(session: &SessionState) -> Vec<SavedInvoice> {
    debug!("list_archive command");
    session.with_session(|s| s.archive.iter().rev().cloned().collect())
}

// =============================================================================
// Suspend / Resume
// =============================================================================

/// Puts the current invoice on hold and clears the form.
pub fn suspend_invoice(session: &SessionState) -> Result<String, ApiError> {
    debug!("suspend_invoice command");
    session.with_session_mut(|s| {
        let id = s.pending.suspend(s.draft.clone())?;
        s.take_draft();
        info!(pending_id = %id, pending = s.pending.len(), "Invoice suspended");
        Ok(id)
    })
}

/// Brings a held invoice back into the form.
///
/// Refused while the form holds an unsaved invoice, so nothing is lost.
pub fn resume_invoice(
    session: &SessionState,
    config: &RegisterConfig,
    id: &str,
) -> Result<InvoiceView, ApiError> {
    debug!(pending_id = %id, "resume_invoice command");
    session.with_session_mut(|s| {
        if !s.draft.is_empty() {
            return Err(ApiError::validation(
                "Current invoice has items; save or suspend it first",
            ));
        }
        s.draft = s.pending.resume(id)?;
        info!(pending_id = %id, "Invoice resumed");
        Ok(InvoiceView::of(s, config))
    })
}

pub fn discard_pending(session: &SessionState, id: &str) {
    debug!(pending_id = %id, "discard_pending command");
    session.with_session_mut(|s| s.pending.discard(id));
}

pub fn list_pending(session: &SessionState, config: &RegisterConfig) -> Vec<PendingSummary> {
    debug!("list_pending command");
    let calculator = config.calculator();
    session.with_session(|s| {
        s.pending
            .list()
            .iter()
            .map(|draft| PendingSummary {
                id: draft.id.clone().unwrap_or_default(),
                item_count: draft.counted_items().len(),
                total: draft.totals(&calculator).total_after_discount,
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use dukkan_core::Product;

    struct Fixture {
        config: RegisterConfig,
        session: SessionState,
        drawer: DrawerState,
        catalog: CatalogState,
    }

    fn fixture() -> Fixture {
        let config = RegisterConfig::default();
        Fixture {
            session: SessionState::new(config.invoice_rows),
            drawer: DrawerState::new(Money::from_halalas(100_000)),
            catalog: CatalogState::new(vec![Product::new(
                "1",
                "شاي",
                10,
                Money::from_halalas(500),
                "store",
            )]),
            config,
        }
    }

    #[test]
    fn test_update_line_recomputes_totals() {
        let f = fixture();
        let view = update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "2", "50")).unwrap();
        assert_eq!(view.totals.subtotal, Money::from_halalas(10_000));
        assert_eq!(view.totals.vat_amount, Money::from_halalas(1_500));

        let view = set_discount(&f.session, &f.config, "15");
        assert_eq!(view.totals.total_after_discount, Money::from_halalas(10_000));
    }

    #[test]
    fn test_update_line_with_huge_values_keeps_working() {
        let f = fixture();
        let huge = LineItemInput::new("شاي", "100000000000", "100000000000");
        let view = update_line(&f.session, &f.config, 0, huge.clone()).unwrap();
        assert!(view.totals.subtotal.is_positive());

        for row in 1..10 {
            update_line(&f.session, &f.config, row, huge.clone()).unwrap();
        }
        // Each row clamps to 1,000,000 × 1,000,000,000.00
        let totals = get_totals(&f.session, &f.config);
        assert_eq!(totals.subtotal, Money::from_halalas(1_000_000_000_000_000_000));

        set_paid(&f.session, &f.config, "100000000000");
        let saved = save_invoice(&f.session, &f.drawer, &f.catalog, &f.config).unwrap();
        assert!(!saved.warnings.is_empty());
        assert_eq!(f.catalog.with_catalog(|p| p[0].quantity), 0);
    }

    #[test]
    fn test_clear_invoice() {
        let f = fixture();
        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "2", "5")).unwrap();
        set_discount(&f.session, &f.config, "1");

        let view = clear_invoice(&f.session, &f.config);
        assert!(view.draft.is_empty());
        assert!(view.totals.subtotal.is_zero());
        assert!(view.totals.discount.is_zero());
        assert_eq!(view.draft.rows.len(), f.config.invoice_rows);
    }

    #[test]
    fn test_discard_pending() {
        let f = fixture();
        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "1", "5")).unwrap();
        let id = suspend_invoice(&f.session).unwrap();
        assert_eq!(list_pending(&f.session, &f.config).len(), 1);

        discard_pending(&f.session, &id);
        assert!(list_pending(&f.session, &f.config).is_empty());
        assert_eq!(
            resume_invoice(&f.session, &f.config, &id).unwrap_err().code,
            ErrorCode::NotFound
        );
        // Unknown ids are ignored
        discard_pending(&f.session, "pending-nope");
    }

    #[test]
    fn test_update_line_bad_index() {
        let f = fixture();
        let err = update_line(&f.session, &f.config, 99, LineItemInput::blank()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_save_requires_paid_amount() {
        let f = fixture();
        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "1", "5")).unwrap();

        let err = save_invoice(&f.session, &f.drawer, &f.catalog, &f.config).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentRequired);
        assert_eq!(f.catalog.with_catalog(|p| p[0].quantity), 10);
        assert!(f.drawer.with_ledger(|l| l.is_empty()));
    }

    #[test]
    fn test_save_empty_invoice() {
        let f = fixture();
        set_paid(&f.session, &f.config, "10");
        let err = save_invoice(&f.session, &f.drawer, &f.catalog, &f.config).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyInvoice);
    }

    #[test]
    fn test_save_with_change() {
        let f = fixture();
        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "2", "5")).unwrap();
        set_paid(&f.session, &f.config, "20");

        // 10.00 + 1.50 VAT = 11.50; paid 20.00 → 8.50 change
        let saved = save_invoice(&f.session, &f.drawer, &f.catalog, &f.config).unwrap();
        assert_eq!(saved.change_due, Money::from_halalas(850));
        assert_eq!(saved.drawer_balance, Money::from_halalas(101_150));
        assert_eq!(f.catalog.with_catalog(|p| p[0].quantity), 8);
        assert!(get_invoice(&f.session, &f.config).draft.is_empty());
    }

    #[test]
    fn test_credit_sale_records_no_cash() {
        let f = fixture();
        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "1", "5")).unwrap();
        set_paid(&f.session, &f.config, "0");

        let saved = save_invoice(&f.session, &f.drawer, &f.catalog, &f.config).unwrap();
        assert_eq!(saved.invoice.totals.balance_due(), Money::from_halalas(575));
        assert!(f.drawer.with_ledger(|l| l.is_empty()));
    }

    #[test]
    fn test_void_returns_stock_and_cash() {
        let f = fixture();
        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "4", "5")).unwrap();
        set_paid(&f.session, &f.config, "23");
        let saved = save_invoice(&f.session, &f.drawer, &f.catalog, &f.config).unwrap();

        let voided = void_invoice(&f.session, &f.drawer, &f.catalog, &saved.invoice.receipt_number).unwrap();
        assert_eq!(voided.refunded, Money::from_halalas(2_300));
        assert_eq!(voided.drawer_balance, Money::from_halalas(100_000));
        assert_eq!(f.catalog.with_catalog(|p| p[0].quantity), 10);
        assert!(list_archive(&f.session).is_empty());

        let err = void_invoice(&f.session, &f.drawer, &f.catalog, &saved.invoice.receipt_number).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_suspend_and_resume() {
        let f = fixture();
        assert_eq!(suspend_invoice(&f.session).unwrap_err().code, ErrorCode::EmptyInvoice);

        update_line(&f.session, &f.config, 0, LineItemInput::new("شاي", "3", "5")).unwrap();
        let id = suspend_invoice(&f.session).unwrap();
        assert!(get_invoice(&f.session, &f.config).draft.is_empty());

        let pending = list_pending(&f.session, &f.config);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].total, Money::from_halalas(1_725));

        let view = resume_invoice(&f.session, &f.config, &id).unwrap();
        assert_eq!(view.draft.id.as_deref(), Some(id.as_str()));
        assert!(list_pending(&f.session, &f.config).is_empty());

        let err = resume_invoice(&f.session, &f.config, &id).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_resume_unknown_id() {
        let f = fixture();
        let err = resume_invoice(&f.session, &f.config, "pending-nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
