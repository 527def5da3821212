//! # Inventory Adjuster
//!
//! Stock movements on a catalog snapshot. The catalog itself lives with the
//! persistence collaborator; these functions mutate the rows they are handed
//! and report what changed so the caller can write it back.
//!
//! ## Movements
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Sale saved ──► apply_sale_deduction                                    │
//! │                 └── by name, first row wins, clamp at 0 + warning       │
//! │                                                                         │
//! │  Transfer   ──► transfer(product, from, to, qty)                        │
//! │                 └── all-or-nothing, InsufficientStock blocks            │
//! │                                                                         │
//! │  Return     ──► apply_sale_return   (inverse of a deduction)            │
//! │  Delivery   ──► restock(product, location, qty)                         │
//! │                                                                         │
//! │  Only `Product::quantity` is ever written.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Oversell vs. Transfer
//! A sale that exceeds stock has already happened at the counter, so it is
//! recorded and flagged. A transfer that exceeds stock has not happened yet,
//! so it is refused.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, OversoldWarning, ValidationError};
use crate::types::{LineItem, Product};
use crate::validation::{validate_location_id, validate_move_quantity};

// =============================================================================
// Results
// =============================================================================

/// Quantity of one stock row before and after a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockChange {
    pub product_id: String,
    pub warehouse_id: String,
    pub before: i64,
    pub after: i64,
}

impl StockChange {
    fn of(product: &Product, before: i64) -> Self {
        StockChange {
            product_id: product.id.clone(),
            warehouse_id: product.warehouse_id.clone(),
            before,
            after: product.quantity,
        }
    }

    #[inline]
    pub fn delta(&self) -> i64 {
        self.after.saturating_sub(self.before)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDeduction {
    pub changes: Vec<StockChange>,
    pub warnings: Vec<OversoldWarning>,
}

impl SaleDeduction {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransferOutcome {
    pub quantity: i64,
    pub source: StockChange,
    pub destination: StockChange,
}

// =============================================================================
// Sale Deduction / Return
// =============================================================================

fn find_by_name<'a>(products: &'a mut [Product], name: &str) -> Option<&'a mut Product> {
    let name = name.trim();
    products.iter_mut().find(|p| p.name.trim() == name)
}

/// Removes sold units from the catalog.
///
/// Lines that are not countable are skipped, as are names with no catalog
/// row (free-typed items). When a line asks for more than the row holds,
/// the row is set to zero and an [`OversoldWarning`] is returned; the sale
/// is never blocked.
pub fn apply_sale_deduction(products: &mut [Product], items: &[LineItem]) -> SaleDeduction {
    let mut deduction = SaleDeduction::default();

    for item in items.iter().filter(|item| item.is_countable()) {
        let Some(product) = find_by_name(products, &item.name) else {
            debug!(name = %item.name, "Sold item has no catalog row, skipping");
            continue;
        };

        let before = product.quantity;
        if item.quantity > before {
            warn!(
                product_id = %product.id,
                available = before,
                requested = item.quantity,
                "Oversold, clamping stock to zero"
            );
            deduction.warnings.push(OversoldWarning {
                product_id: product.id.clone(),
                name: product.name.clone(),
                warehouse_id: product.warehouse_id.clone(),
                available: before,
                requested: item.quantity,
            });
            product.quantity = 0;
        } else {
            product.quantity = before - item.quantity;
        }

        deduction.changes.push(StockChange::of(product, before));
    }

    deduction
}

/// Puts returned units back on the row they would have been deducted from.
pub fn apply_sale_return(products: &mut [Product], items: &[LineItem]) -> Vec<StockChange> {
    let mut changes = Vec::new();

    for item in items.iter().filter(|item| item.is_countable()) {
        let Some(product) = find_by_name(products, &item.name) else {
            debug!(name = %item.name, "Returned item has no catalog row, skipping");
            continue;
        };
        let before = product.quantity;
        product.quantity = before.saturating_add(item.quantity);
        changes.push(StockChange::of(product, before));
    }

    changes
}

// =============================================================================
// Transfer / Restock
// =============================================================================

fn position_of(products: &[Product], product_id: &str, location: &str) -> CoreResult<usize> {
    products
        .iter()
        .position(|p| p.is_stock_row(product_id, location))
        .ok_or_else(|| CoreError::ProductNotFound {
            product_id: product_id.to_string(),
            location: location.to_string(),
        })
}

/// Moves `quantity` units of one product between two locations.
///
/// ## Errors
/// - `Validation` when the quantity is not positive or the locations are
///   blank or identical
/// - `ProductNotFound` when either location has no row for the product
/// - `InsufficientStock` when the source holds fewer than `quantity`
///
/// Both rows are left untouched on any error.
///
/// ## Example
/// ```rust
/// use dukkan_core::inventory::transfer;
/// use dukkan_core::{Money, Product};
///
/// let mut catalog = vec![
///     Product::new("1", "منتج أ", 100, Money::from_halalas(500), "main"),
///     Product::new("1", "منتج أ", 0, Money::from_halalas(500), "store"),
/// ];
/// transfer(&mut catalog, "1", "main", "store", 40).unwrap();
/// assert_eq!(catalog[0].quantity, 60);
/// assert_eq!(catalog[1].quantity, 40);
/// ```
pub fn transfer(
    products: &mut [Product],
    product_id: &str,
    from: &str,
    to: &str,
    quantity: i64,
) -> CoreResult<TransferOutcome> {
    validate_move_quantity(quantity)?;
    validate_location_id("from", from)?;
    validate_location_id("to", to)?;
    if from == to {
        return Err(ValidationError::InvalidFormat {
            field: "to".to_string(),
            reason: "destination must differ from source".to_string(),
        }
        .into());
    }

    let source = position_of(products, product_id, from)?;
    let destination = position_of(products, product_id, to)?;

    let available = products[source].quantity;
    if quantity > available {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            location: from.to_string(),
            available,
            requested: quantity,
        });
    }

    let source_before = products[source].quantity;
    products[source].quantity = source_before - quantity;
    let source_change = StockChange::of(&products[source], source_before);

    let destination_before = products[destination].quantity;
    products[destination].quantity = destination_before.saturating_add(quantity);
    let destination_change = StockChange::of(&products[destination], destination_before);

    debug!(product_id, from, to, quantity, "Stock transferred");

    Ok(TransferOutcome {
        quantity,
        source: source_change,
        destination: destination_change,
    })
}

/// Receives `quantity` units of a product at one location.
pub fn restock(
    products: &mut [Product],
    product_id: &str,
    location: &str,
    quantity: i64,
) -> CoreResult<StockChange> {
    validate_move_quantity(quantity)?;
    validate_location_id("location", location)?;

    let index = position_of(products, product_id, location)?;
    let product = &mut products[index];
    let before = product.quantity;
    product.quantity = before.saturating_add(quantity);

    Ok(StockChange::of(product, before))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("1", "منتج أ", 100, Money::from_halalas(500), "main"),
            Product::new("1", "منتج أ", 10, Money::from_halalas(500), "store"),
            Product::new("2", "منتج ب", 5, Money::from_halalas(1000), "store"),
        ]
    }

    fn line(name: &str, qty: i64) -> LineItem {
        LineItem::new(name, qty, Money::from_halalas(100))
    }

    #[test]
    fn test_deduction_first_row_wins() {
        let mut products = catalog();
        let result = apply_sale_deduction(&mut products, &[line("منتج أ", 3)]);

        assert_eq!(products[0].quantity, 97);
        assert_eq!(products[1].quantity, 10);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].delta(), -3);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_oversold_clamps_and_warns() {
        let mut products = catalog();
        let result = apply_sale_deduction(&mut products, &[line("منتج ب", 7)]);

        assert_eq!(products[2].quantity, 0);
        assert_eq!(result.warnings.len(), 1);
        let warning = &result.warnings[0];
        assert_eq!(warning.product_id, "2");
        assert_eq!(warning.available, 5);
        assert_eq!(warning.requested, 7);
    }

    #[test]
    fn test_deduction_skips_unknown_and_uncounted() {
        let mut products = catalog();
        let before = products.clone();
        let result = apply_sale_deduction(
            &mut products,
            &[line("غير موجود", 2), line("منتج أ", 0), LineItem::new("منتج ب", 1, Money::zero())],
        );

        assert_eq!(products, before);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_deduction_matches_trimmed_name() {
        let mut products = catalog();
        apply_sale_deduction(&mut products, &[line("  منتج ب ", 2)]);
        assert_eq!(products[2].quantity, 3);
    }

    #[test]
    fn test_deduction_then_return_restores() {
        let mut products = catalog();
        let original = products.clone();
        let items = [line("منتج أ", 4), line("منتج ب", 5)];

        let result = apply_sale_deduction(&mut products, &items);
        assert!(!result.has_warnings());
        apply_sale_return(&mut products, &items);

        assert_eq!(products, original);
    }

    #[test]
    fn test_transfer_moves_stock() {
        let mut products = catalog();
        let outcome = transfer(&mut products, "1", "main", "store", 30).unwrap();

        assert_eq!(products[0].quantity, 70);
        assert_eq!(products[1].quantity, 40);
        assert_eq!(outcome.source.delta(), -30);
        assert_eq!(outcome.destination.delta(), 30);
    }

    #[test]
    fn test_transfer_insufficient_stock_changes_nothing() {
        let mut products = catalog();
        let before = products.clone();

        let err = transfer(&mut products, "1", "main", "store", 150).unwrap_err();
        match err {
            CoreError::InsufficientStock { available, requested, .. } => {
                assert_eq!(available, 100);
                assert_eq!(requested, 150);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(products, before);
    }

    #[test]
    fn test_transfer_missing_destination_changes_nothing() {
        let mut products = catalog();
        let before = products.clone();

        let err = transfer(&mut products, "2", "store", "main", 1).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound { ref location, .. } if location == "main"));
        assert_eq!(products, before);
    }

    #[test]
    fn test_transfer_rejects_bad_input() {
        let mut products = catalog();
        assert!(matches!(
            transfer(&mut products, "1", "main", "store", 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            transfer(&mut products, "1", "main", "main", 1),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(products[0].quantity, 100);
    }

    #[test]
    fn test_transfer_whole_stock() {
        let mut products = catalog();
        transfer(&mut products, "1", "store", "main", 10).unwrap();
        assert_eq!(products[1].quantity, 0);
        assert_eq!(products[0].quantity, 110);
    }

    #[test]
    fn test_transfer_large_quantity_in_stock() {
        let mut products = vec![
            Product::new("9", "أرز", 5_000_000, Money::from_halalas(100), "main"),
            Product::new("9", "أرز", 0, Money::from_halalas(100), "store"),
        ];
        let outcome = transfer(&mut products, "9", "main", "store", 2_000_000).unwrap();

        assert_eq!(outcome.quantity, 2_000_000);
        assert_eq!(products[0].quantity, 3_000_000);
        assert_eq!(products[1].quantity, 2_000_000);
    }

    #[test]
    fn test_restock_saturates() {
        let mut products = catalog();
        let change = restock(&mut products, "2", "store", i64::MAX).unwrap();
        assert_eq!(change.after, i64::MAX);
        assert_eq!(change.delta(), i64::MAX - 5);
    }

    #[test]
    fn test_sale_of_exact_stock_leaves_zero_without_warning() {
        let mut products = catalog();
        let result = apply_sale_deduction(&mut products, &[line("منتج ب", 5)]);

        assert_eq!(products[2].quantity, 0);
        assert!(!result.has_warnings());
        assert_eq!(result.changes[0].delta(), -5);
    }

    #[test]
    fn test_restock() {
        let mut products = catalog();
        let change = restock(&mut products, "2", "store", 20).unwrap();
        assert_eq!(change.before, 5);
        assert_eq!(change.after, 25);
        assert!(restock(&mut products, "2", "main", 1).is_err());
        assert!(restock(&mut products, "2", "store", -1).is_err());
    }
}
