//! # Dukkan Register
//!
//! The register layer between the Arabic POS screens and `dukkan-core`.
//!
//! ## Module Organization
//! ```text
//! dukkan_register/
//! ├── lib.rs          ◄─── You are here (Register bundle, tracing, checkout)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── RegisterConfig (file + env)
//! │   ├── session.rs  ◄─── Draft, pending and archived invoices
//! │   ├── drawer.rs   ◄─── Cash drawer ledger
//! │   └── catalog.rs  ◄─── Product snapshot
//! ├── commands/
//! │   ├── invoice.rs  ◄─── Invoice form commands
//! │   ├── drawer.rs   ◄─── Cash box commands
//! │   └── inventory.rs◄─── Warehouse commands
//! └── error.rs        ◄─── ApiError returned by commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          RUST_LOG, default info,dukkan=debug         │
//! │  2. RegisterConfig::load()  defaults → register.toml → DUKKAN_*         │
//! │  3. Register::new(config)   blank draft, drawer at the opening float    │
//! │  4. load_catalog(snapshot)  rows from the products endpoint             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use dukkan_core::invoice::SavedInvoice;
use dukkan_core::{LineItemInput, Money, OversoldWarning, Product};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{CatalogState, DrawerState, RegisterConfig, SessionState};

/// Every state object of one register, built from its configuration.
#[derive(Debug)]
pub struct Register {
    pub config: RegisterConfig,
    pub session: SessionState,
    pub drawer: DrawerState,
    pub catalog: CatalogState,
}

impl Register {
    pub fn new(config: RegisterConfig) -> Self {
        info!(
            store = %config.store_name,
            vat_bps = config.vat_rate_bps,
            opening_float = %config.opening_float,
            "Register initialized"
        );
        Register {
            session: SessionState::new(config.invoice_rows),
            drawer: DrawerState::new(config.opening_float),
            catalog: CatalogState::default(),
            config,
        }
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=dukkan=trace` - Trace for dukkan crates only
/// - Default: `info,dukkan=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dukkan=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Offline Checkout
// =============================================================================

/// An invoice as typed into the form, all fields raw.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    pub rows: Vec<LineItemInput>,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub paid: String,
}

/// What a save leaves behind: the archived invoice, the oversold lines, the
/// catalog to write back and the drawer balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReport {
    pub invoice: SavedInvoice,
    pub warnings: Vec<OversoldWarning>,
    pub catalog: Vec<Product>,
    pub drawer_balance: Money,
    /// ISO 4217 code of every amount above
    pub currency: String,
    /// Grand total as shown on the receipt, e.g. `23.00 ريال`
    pub total_display: String,
    /// Change as shown on the receipt
    pub change_display: String,
}

/// Runs the whole save path against a catalog snapshot.
pub fn checkout(
    register: &Register,
    products: Vec<Product>,
    input: CheckoutInput,
) -> Result<CheckoutReport, ApiError> {
    use commands::{inventory, invoice};

    inventory::load_catalog(&register.catalog, products);

    let row_count = input.rows.len();
    register.session.with_session_mut(|s| {
        while s.draft.rows.len() < row_count {
            s.draft.rows.push(LineItemInput::blank());
        }
    });
    for (index, row) in input.rows.into_iter().enumerate() {
        invoice::update_line(&register.session, &register.config, index, row)?;
    }
    invoice::set_discount(&register.session, &register.config, &input.discount);
    invoice::set_paid(&register.session, &register.config, &input.paid);

    let saved = invoice::save_invoice(
        &register.session,
        &register.drawer,
        &register.catalog,
        &register.config,
    )?;

    let config = &register.config;
    Ok(CheckoutReport {
        total_display: config.format_currency(saved.invoice.totals.total_after_discount),
        change_display: config.format_currency(saved.change_due),
        currency: config.currency_code.clone(),
        invoice: saved.invoice,
        warnings: saved.warnings,
        catalog: inventory::catalog_snapshot(&register.catalog),
        drawer_balance: saved.drawer_balance,
    })
}
