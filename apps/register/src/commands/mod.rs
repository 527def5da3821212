//! # Commands Module
//!
//! Everything the UI can ask the register to do.
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here
//! ├── invoice.rs    ◄─── Invoice form, save, void, suspend/resume
//! ├── drawer.rs     ◄─── Deposits, withdrawals, reports, shift summary
//! └── inventory.rs  ◄─── Catalog snapshot, transfers, restocks
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the drawer
//! fn get_balance(drawer: &DrawerState) -> Money
//!
//! // Needs the whole register
//! fn save_invoice(session: &SessionState, drawer: &DrawerState,
//!                 catalog: &CatalogState, config: &RegisterConfig)
//! ```

pub mod drawer;
pub mod inventory;
pub mod invoice;
