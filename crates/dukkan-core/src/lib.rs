//! # dukkan-core: Pure Business Logic for Dukkan POS
//!
//! Every number the register shows (line totals, VAT, remaining amount,
//! drawer balance, stock on hand) is derived here. The crate performs no I/O:
//! catalog snapshots come in as values and go back out as values.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dukkan POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Frontend (Arabic RTL invoice & cash-box forms)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw field strings                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              apps/register (state + commands)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukkan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  invoice  │  │  ledger   │  │ inventory │  │   money   │  │   │
//! │  │   │ VAT, paid │  │  drawer   │  │ deduction │  │  halalas  │  │   │
//! │  │   │ remaining │  │  balance  │  │ transfer  │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in halalas, lenient parsing of form input
//! - [`types`] - Domain types (LineItem, Product, LedgerEntry, TaxRate)
//! - [`invoice`] - Invoice totals and the editable invoice draft
//! - [`ledger`] - Cash drawer ledger and shift summary
//! - [`inventory`] - Stock deltas for sales, returns, restocks and transfers
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators used at the edges
//!
//! ## Example Usage
//!
//! ```rust
//! use dukkan_core::invoice::InvoiceCalculator;
//! use dukkan_core::{LineItem, Money, TaxRate};
//!
//! let calculator = InvoiceCalculator::new(TaxRate::from_bps(1500));
//! let items = vec![LineItem::new("شاي", 2, Money::from_major_minor(50, 0))];
//!
//! let totals = calculator.totals(&items, Money::zero(), Some(Money::from_major_minor(100, 0)));
//! assert_eq!(totals.total_after_discount.halalas(), 115_00);
//! assert_eq!(totals.remaining.halalas(), 15_00);
//! assert!(!totals.remaining_is_owed_by_customer);
//! ```

pub mod error;
pub mod inventory;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, OversoldWarning, ValidationError};
pub use money::Money;
pub use types::*;

/// Standard Saudi VAT rate in basis points (15%).
pub const DEFAULT_VAT_RATE_BPS: u32 = 1500;

/// Number of blank rows a fresh invoice form starts with.
pub const DEFAULT_INVOICE_ROWS: usize = 11;
