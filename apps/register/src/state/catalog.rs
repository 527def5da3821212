//! # Catalog State
//!
//! The last product snapshot received from the persistence side, one row
//! per product per location. Commands mutate it in place and hand the
//! result back through `catalog_snapshot`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dukkan_core::Product;

#[derive(Debug, Default)]
pub struct CatalogState {
    products: Arc<Mutex<Vec<Product>>>,
}

impl CatalogState {
    pub fn new(products: Vec<Product>) -> Self {
        CatalogState {
            products: Arc::new(Mutex::new(products)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Product]) -> R,
    {
        f(&self.lock())
    }

    pub fn with_catalog_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<Product>) -> R,
    {
        f(&mut self.lock())
    }
}
