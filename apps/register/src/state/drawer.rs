//! # Drawer State
//!
//! Wraps the shift's [`CashDrawerLedger`]. Deposits, withdrawals and sale
//! payments all go through the same lock, so the balance shown after a
//! command always includes that command's entry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dukkan_core::ledger::CashDrawerLedger;
use dukkan_core::Money;

#[derive(Debug)]
pub struct DrawerState {
    ledger: Arc<Mutex<CashDrawerLedger>>,
}

impl DrawerState {
    pub fn new(opening_float: Money) -> Self {
        DrawerState {
            ledger: Arc::new(Mutex::new(CashDrawerLedger::new(opening_float))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CashDrawerLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CashDrawerLedger) -> R,
    {
        f(&self.lock())
    }

    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CashDrawerLedger) -> R,
    {
        f(&mut self.lock())
    }
}

impl Default for DrawerState {
    fn default() -> Self {
        Self::new(Money::zero())
    }
}
