//! # Inventory Commands
//!
//! Catalog snapshot exchange plus the warehouse screen's movements.
//!
//! ```text
//! persistence ──load_catalog([...])──► CatalogState ──catalog_snapshot()──► persistence
//!                                          ▲
//!                      transfer_stock ─────┤
//!                      restock ────────────┘
//! ```

use dukkan_core::inventory::{self, StockChange, TransferOutcome};
use dukkan_core::Product;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CatalogState, RegisterConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub product_id: String,
    /// Defaults to the storage location
    #[serde(default)]
    pub from: Option<String>,
    /// Defaults to the sales location
    #[serde(default)]
    pub to: Option<String>,
    pub quantity: i64,
}

/// Replaces the catalog with a fresh snapshot. Returns the row count.
pub fn load_catalog(catalog: &CatalogState, products: Vec<Product>) -> usize {
    let count = products.len();
    catalog.with_catalog_mut(|rows| *rows = products);
    info!(rows = count, "Catalog loaded");
    count
}

pub fn catalog_snapshot(catalog: &CatalogState) -> Vec<Product> {
    catalog.with_catalog(|rows| rows.to_vec())
}

/// Products stocked at one location.
pub fn stock_at(catalog: &CatalogState, location: &str) -> Vec<Product> {
    catalog.with_catalog(|rows| {
        rows.iter()
            .filter(|p| p.warehouse_id == location)
            .cloned()
            .collect()
    })
}

/// Moves stock between locations, by default from the back room to the
/// counter.
pub fn transfer_stock(
    catalog: &CatalogState,
    config: &RegisterConfig,
    request: TransferRequest,
) -> Result<TransferOutcome, ApiError> {
    let from = request.from.as_deref().unwrap_or(&config.storage_location);
    let to = request.to.as_deref().unwrap_or(&config.sales_location);
    debug!(product_id = %request.product_id, from, to, quantity = request.quantity, "transfer_stock command");

    let outcome = catalog.with_catalog_mut(|rows| {
        inventory::transfer(rows, &request.product_id, from, to, request.quantity)
    })?;

    info!(
        product_id = %request.product_id,
        source_left = outcome.source.after,
        destination_now = outcome.destination.after,
        "Transfer applied"
    );
    Ok(outcome)
}

pub fn restock(
    catalog: &CatalogState,
    product_id: &str,
    location: &str,
    quantity: i64,
) -> Result<StockChange, ApiError> {
    debug!(product_id, location, quantity, "restock command");
    let change = catalog.with_catalog_mut(|rows| inventory::restock(rows, product_id, location, quantity))?;
    info!(product_id, location, now = change.after, "Restocked");
    Ok(change)
}
