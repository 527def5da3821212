//! # State Module
//!
//! One state type per concern. Each command takes only the states it needs,
//! always locking in the order session → drawer → catalog.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌────────────────┐ │
//! │  │ SessionState │ │ DrawerState  │ │ CatalogState │ │ RegisterConfig │ │
//! │  │              │ │              │ │              │ │                │ │
//! │  │ Arc<Mutex<   │ │ Arc<Mutex<   │ │ Arc<Mutex<   │ │ read-only      │ │
//! │  │  Session>>   │ │  Ledger>>    │ │  Vec<Product>│ │ after load     │ │
//! │  │ draft,       │ │ entries,     │ │  >>          │ │                │ │
//! │  │ pending,     │ │ opening      │ │              │ │                │ │
//! │  │ archive      │ │ float        │ │              │ │                │ │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod drawer;
mod session;

pub use catalog::CatalogState;
pub use config::RegisterConfig;
pub use drawer::DrawerState;
pub use session::{Session, SessionState};
