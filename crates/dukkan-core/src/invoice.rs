//! # Invoice Calculation
//!
//! Totals for cash invoices, credit invoices and the point-of-sale screen.
//! All three forms call into this module instead of carrying their own math.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  rows (raw strings) ──► LineItem::from_input ──► counted items only     │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                    subtotal = Σ quantity × unit_price   │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                    vat = subtotal × rate                │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                          grand total = subtotal + vat − discount        │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                     remaining = |paid − grand total|, direction flag    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are always recomputed from the complete current row list, never
//! from a previously cached subtotal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineItem, LineItemInput, TaxRate};

// =============================================================================
// Pure Functions
// =============================================================================

/// `quantity × unit_price`. Zero whenever either side is zero.
#[inline]
pub fn compute_line_total(item: &LineItem) -> Money {
    item.line_total()
}

/// Sum of line totals over countable items.
///
/// A row with a name and a price but no quantity (or any other partial row)
/// contributes nothing.
pub fn compute_subtotal(items: &[LineItem]) -> Money {
    items
        .iter()
        .filter(|item| item.is_countable())
        .map(compute_line_total)
        .sum()
}

#[inline]
pub fn compute_vat(subtotal: Money, vat_rate: TaxRate) -> Money {
    subtotal.calculate_tax(vat_rate)
}

/// `subtotal + vat − discount`. Not floored: a discount larger than the
/// invoice yields a negative total.
#[inline]
pub fn compute_grand_total(subtotal: Money, vat: Money, discount: Money) -> Money {
    subtotal + vat - discount
}

/// Distance between what was paid and what is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Remaining {
    pub amount: Money,
    /// `true` when the customer paid more than the total and is owed change.
    pub owed_to_customer: bool,
}

/// An unset paid amount counts as zero.
///
/// ## Example
/// ```rust
/// use dukkan_core::invoice::compute_remaining;
/// use dukkan_core::Money;
///
/// let r = compute_remaining(Money::from_halalas(11500), Some(Money::from_halalas(10000)));
/// assert_eq!(r.amount.halalas(), 1500);
/// assert!(!r.owed_to_customer);
/// ```
pub fn compute_remaining(grand_total: Money, paid: Option<Money>) -> Remaining {
    let paid = paid.unwrap_or_default();
    let difference = paid - grand_total;
    Remaining {
        amount: difference.abs(),
        owed_to_customer: difference.is_positive(),
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Everything the totals panel of an invoice displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub vat_amount: Money,
    pub total_with_vat: Money,
    pub discount: Money,
    pub total_after_discount: Money,
    pub paid_amount: Money,
    pub remaining: Money,
    /// Change is due to the customer (`paid_amount > total_after_discount`).
    pub remaining_is_owed_by_customer: bool,
}

impl InvoiceTotals {
    /// Change handed back to the customer, zero when they still owe money.
    pub fn change_due(&self) -> Money {
        if self.remaining_is_owed_by_customer {
            self.remaining
        } else {
            Money::zero()
        }
    }

    /// Cash that stays in the drawer: the paid amount less any change.
    pub fn cash_retained(&self) -> Money {
        (self.paid_amount - self.change_due()).non_negative()
    }

    /// Amount still owed by the customer (credit balance).
    pub fn balance_due(&self) -> Money {
        if self.remaining_is_owed_by_customer {
            Money::zero()
        } else {
            self.remaining
        }
    }
}

/// Invoice calculator configured with the store's VAT rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvoiceCalculator {
    vat_rate: TaxRate,
}

impl InvoiceCalculator {
    pub const fn new(vat_rate: TaxRate) -> Self {
        InvoiceCalculator { vat_rate }
    }

    #[inline]
    pub fn vat_rate(&self) -> TaxRate {
        self.vat_rate
    }

    /// Computes the full totals panel from the current items and payment.
    pub fn totals(&self, items: &[LineItem], discount: Money, paid: Option<Money>) -> InvoiceTotals {
        let subtotal = compute_subtotal(items);
        let vat_amount = compute_vat(subtotal, self.vat_rate);
        let total_with_vat = subtotal + vat_amount;
        let total_after_discount = compute_grand_total(subtotal, vat_amount, discount);
        let remaining = compute_remaining(total_after_discount, paid);

        InvoiceTotals {
            subtotal,
            vat_amount,
            total_with_vat,
            discount,
            total_after_discount,
            paid_amount: paid.unwrap_or_default(),
            remaining: remaining.amount,
            remaining_is_owed_by_customer: remaining.owed_to_customer,
        }
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The editable invoice form.
///
/// ## Row Lifecycle
/// ```text
/// fresh form: 11 blank rows
///      │
///      ▼
/// cashier types into row i ──► update_row(i, input)
///      │
///      └── i is the last row and it became countable
///              │
///              ▼
///          a new blank row is appended
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDraft {
    /// Set when the draft was resumed from the pending list.
    pub id: Option<String>,
    pub rows: Vec<LineItemInput>,
    pub discount: Money,
    /// `None` until the cashier types something into the paid field.
    pub paid: Option<Money>,
}

impl InvoiceDraft {
    pub fn new(blank_rows: usize) -> Self {
        InvoiceDraft {
            id: None,
            rows: vec![LineItemInput::blank(); blank_rows.max(1)],
            discount: Money::zero(),
            paid: None,
        }
    }

    /// Replaces one row, appending a blank row when the last row is filled.
    pub fn update_row(&mut self, index: usize, input: LineItemInput) -> CoreResult<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| ValidationError::OutOfRange {
            field: "row".to_string(),
            min: 0,
            max: len as i64 - 1,
        })?;
        *row = input;

        if index == len - 1 && LineItem::from_input(&self.rows[index]).is_countable() {
            self.rows.push(LineItemInput::blank());
        }
        Ok(())
    }

    /// Sets the flat discount. Coerced like every other invoice field.
    pub fn set_discount(&mut self, raw: &str) {
        self.discount = Money::parse_lenient(raw);
    }

    /// Sets the paid amount; a blank field clears it.
    pub fn set_paid(&mut self, raw: &str) {
        self.paid = if raw.trim().is_empty() {
            None
        } else {
            Some(Money::parse_lenient(raw).non_negative())
        };
    }

    /// Rows that enter the totals, already coerced.
    pub fn counted_items(&self) -> Vec<LineItem> {
        self.rows
            .iter()
            .map(LineItem::from_input)
            .filter(LineItem::is_countable)
            .collect()
    }

    /// True when no row is countable.
    pub fn is_empty(&self) -> bool {
        !self
            .rows
            .iter()
            .any(|row| LineItem::from_input(row).is_countable())
    }

    pub fn totals(&self, calculator: &InvoiceCalculator) -> InvoiceTotals {
        calculator.totals(&self.counted_items(), self.discount, self.paid)
    }

    /// Checks the draft can be saved and returns its items and totals.
    ///
    /// A paid amount of zero is accepted (credit sale); an unset one is not.
    pub fn finalize(&self, calculator: &InvoiceCalculator) -> CoreResult<(Vec<LineItem>, InvoiceTotals)> {
        let items = self.counted_items();
        if items.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }
        if self.paid.is_none() {
            return Err(CoreError::PaymentRequired);
        }
        let totals = calculator.totals(&items, self.discount, self.paid);
        Ok((items, totals))
    }
}

// =============================================================================
// Saved & Pending Invoices
// =============================================================================

/// An invoice after a successful save, as shown in the sales archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SavedInvoice {
    pub id: String,
    pub receipt_number: String,
    #[ts(as = "String")]
    pub issued_on: NaiveDate,
    pub items: Vec<LineItem>,
    pub totals: InvoiceTotals,
    #[ts(as = "String")]
    pub saved_at: DateTime<Utc>,
}

/// Invoices put on hold while the cashier serves another customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingInvoices {
    invoices: Vec<InvoiceDraft>,
}

impl PendingInvoices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a draft on hold and returns its id.
    ///
    /// A draft that was itself resumed keeps its id and replaces any older
    /// copy instead of being listed twice.
    pub fn suspend(&mut self, mut draft: InvoiceDraft) -> CoreResult<String> {
        if draft.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }

        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| format!("pending-{}", Uuid::new_v4().simple()));
        draft.id = Some(id.clone());

        self.invoices.retain(|pending| pending.id.as_deref() != Some(id.as_str()));
        self.invoices.push(draft);
        Ok(id)
    }

    /// Takes a draft off hold. It leaves the pending list.
    pub fn resume(&mut self, id: &str) -> CoreResult<InvoiceDraft> {
        let position = self
            .invoices
            .iter()
            .position(|pending| pending.id.as_deref() == Some(id))
            .ok_or_else(|| CoreError::InvoiceNotFound(id.to_string()))?;
        Ok(self.invoices.remove(position))
    }

    /// Drops a draft that was resumed and then saved.
    pub fn discard(&mut self, id: &str) {
        self.invoices.retain(|pending| pending.id.as_deref() != Some(id));
    }

    pub fn list(&self) -> &[InvoiceDraft] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sar(riyals: i64) -> Money {
        Money::from_major_minor(riyals, 0)
    }

    fn calculator() -> InvoiceCalculator {
        InvoiceCalculator::new(TaxRate::from_bps(1500))
    }

    #[test]
    fn test_line_total() {
        assert_eq!(compute_line_total(&LineItem::new("a", 3, sar(4))), sar(12));
        assert!(compute_line_total(&LineItem::new("a", 0, sar(4))).is_zero());
        assert!(compute_line_total(&LineItem::new("a", 3, Money::zero())).is_zero());
    }

    #[test]
    fn test_subtotal_excludes_partial_rows() {
        let items = vec![
            LineItem::new("شاي", 2, sar(10)),
            LineItem::new("", 5, sar(10)),
            LineItem::new("سكر", 0, sar(10)),
            LineItem::new("قهوة", 1, Money::zero()),
            LineItem::new("ماء", 4, sar(1)),
        ];
        assert_eq!(compute_subtotal(&items), sar(24));
    }

    #[test]
    fn test_vat_and_grand_total() {
        assert_eq!(compute_vat(sar(100), TaxRate::from_bps(1500)), sar(15));
        assert_eq!(compute_grand_total(sar(100), sar(15), Money::zero()), sar(115));
        assert_eq!(compute_grand_total(sar(100), sar(15), sar(200)), sar(-85));
    }

    #[test]
    fn test_remaining_directions() {
        let r = compute_remaining(sar(115), Some(sar(100)));
        assert_eq!((r.amount, r.owed_to_customer), (sar(15), false));

        let r = compute_remaining(sar(100), Some(sar(115)));
        assert_eq!((r.amount, r.owed_to_customer), (sar(15), true));

        let r = compute_remaining(sar(100), Some(sar(100)));
        assert_eq!((r.amount, r.owed_to_customer), (Money::zero(), false));

        let r = compute_remaining(sar(100), None);
        assert_eq!((r.amount, r.owed_to_customer), (sar(100), false));
    }

    #[test]
    fn test_empty_invoice_totals() {
        let totals = calculator().totals(&[], sar(10), None);
        assert!(totals.subtotal.is_zero());
        assert!(totals.vat_amount.is_zero());
        assert_eq!(totals.total_after_discount, sar(-10));
        // paid 0 > -10, so the "remaining" is change owed
        assert!(totals.remaining_is_owed_by_customer);
        assert_eq!(totals.remaining, sar(10));
    }

    #[test]
    fn test_totals_invariants() {
        let items = vec![LineItem::new("أرز", 4, sar(25))];
        let totals = calculator().totals(&items, sar(5), Some(sar(200)));

        assert_eq!(totals.subtotal, sar(100));
        assert_eq!(totals.total_with_vat, totals.subtotal + totals.vat_amount);
        assert_eq!(totals.total_after_discount, totals.total_with_vat - totals.discount);
        assert_eq!(totals.total_after_discount, sar(110));
        assert_eq!(totals.remaining, sar(90));
        assert!(totals.remaining_is_owed_by_customer);
        assert_eq!(totals.change_due(), sar(90));
        assert_eq!(totals.cash_retained(), sar(110));
        assert!(totals.balance_due().is_zero());
    }

    #[test]
    fn test_huge_form_values_are_clamped() {
        use crate::money::MAX_FORM_AMOUNT;
        use crate::types::MAX_LINE_QUANTITY;

        let row = LineItemInput::new("x", "100000000000", "100000000000");
        let item = LineItem::from_input(&row);
        assert_eq!(item.quantity, MAX_LINE_QUANTITY);
        assert_eq!(item.unit_price, MAX_FORM_AMOUNT);

        let totals = calculator().totals(&[item.clone()], Money::zero(), None);
        assert_eq!(totals.subtotal, MAX_FORM_AMOUNT * MAX_LINE_QUANTITY);
        assert!(!totals.remaining_is_owed_by_customer);

        // Enough rows to pass i64::MAX: the sum saturates
        let items = vec![item; 200];
        let totals = calculator().totals(&items, Money::parse_lenient("-100000000000"), None);
        assert_eq!(totals.subtotal, Money::from_halalas(i64::MAX));
        assert_eq!(totals.total_after_discount, Money::from_halalas(i64::MAX));
    }

    #[test]
    fn test_credit_sale_cash_retained() {
        let items = vec![LineItem::new("أرز", 1, sar(100))];
        let totals = calculator().totals(&items, Money::zero(), Some(sar(40)));
        assert_eq!(totals.cash_retained(), sar(40));
        assert_eq!(totals.balance_due(), sar(75));
    }

    #[test]
    fn test_draft_auto_appends_row() {
        let mut draft = InvoiceDraft::new(2);
        draft.update_row(0, LineItemInput::new("شاي", "1", "5")).unwrap();
        assert_eq!(draft.rows.len(), 2);

        // last row partially filled: no new row yet
        draft.update_row(1, LineItemInput::new("قهوة", "", "7")).unwrap();
        assert_eq!(draft.rows.len(), 2);

        draft.update_row(1, LineItemInput::new("قهوة", "2", "7")).unwrap();
        assert_eq!(draft.rows.len(), 3);
        assert_eq!(draft.rows[2], LineItemInput::blank());
    }

    #[test]
    fn test_draft_rejects_out_of_range_row() {
        let mut draft = InvoiceDraft::new(1);
        let err = draft.update_row(5, LineItemInput::blank()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_draft_paid_field() {
        let mut draft = InvoiceDraft::new(1);
        draft.set_paid("  ");
        assert_eq!(draft.paid, None);
        draft.set_paid("0");
        assert_eq!(draft.paid, Some(Money::zero()));
        draft.set_paid("abc");
        assert_eq!(draft.paid, Some(Money::zero()));
        draft.set_paid("120.5");
        assert_eq!(draft.paid, Some(Money::from_halalas(12050)));
    }

    #[test]
    fn test_draft_totals_follow_latest_edit() {
        let calc = calculator();
        let mut draft = InvoiceDraft::new(3);
        draft.update_row(0, LineItemInput::new("شاي", "1", "100")).unwrap();
        assert_eq!(draft.totals(&calc).total_with_vat, sar(115));

        draft.update_row(0, LineItemInput::new("شاي", "2", "100")).unwrap();
        assert_eq!(draft.totals(&calc).total_with_vat, sar(230));
    }

    #[test]
    fn test_finalize_rules() {
        let calc = calculator();
        let mut draft = InvoiceDraft::new(2);
        assert!(matches!(draft.finalize(&calc), Err(CoreError::EmptyInvoice)));

        draft.update_row(0, LineItemInput::new("شاي", "1", "10")).unwrap();
        assert!(matches!(draft.finalize(&calc), Err(CoreError::PaymentRequired)));

        draft.set_paid("0");
        let (items, totals) = draft.finalize(&calc).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(totals.balance_due(), Money::from_halalas(1150));
    }

    #[test]
    fn test_pending_suspend_and_resume() {
        let mut pending = PendingInvoices::new();
        assert!(matches!(
            pending.suspend(InvoiceDraft::new(3)),
            Err(CoreError::EmptyInvoice)
        ));

        let mut draft = InvoiceDraft::new(1);
        draft.update_row(0, LineItemInput::new("شاي", "1", "10")).unwrap();
        let id = pending.suspend(draft).unwrap();
        assert_eq!(pending.len(), 1);

        let mut resumed = pending.resume(&id).unwrap();
        assert!(pending.is_empty());
        assert_eq!(resumed.id.as_deref(), Some(id.as_str()));

        // suspending a resumed draft keeps its id
        resumed.set_discount("1");
        let again = pending.suspend(resumed).unwrap();
        assert_eq!(again, id);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.list()[0].discount, sar(1));

        assert!(matches!(pending.resume("missing"), Err(CoreError::InvoiceNotFound(_))));
    }
}
