//! # Validation Module
//!
//! Validators for the few fields that are rejected instead of coerced.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Coerce vs. Reject                                  │
//! │                                                                         │
//! │  Invoice fields (quantity, price, paid, discount)                      │
//! │  └── coerced: blank / non-numeric → 0 (see money.rs)                   │
//! │                                                                         │
//! │  Drawer entries, transfers, configuration                              │
//! │  └── THIS MODULE: rejected with ValidationError                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted drawer entry description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Longest accepted related-document reference (invoice / voucher number).
pub const MAX_DOCUMENT_REF_LEN: usize = 50;

/// Validates a drawer entry description.
///
/// ## Example
/// ```rust
/// use dukkan_core::validation::validate_description;
///
/// assert!(validate_description("مستلزمات مكتبية").is_ok());
/// assert!(validate_description("  ").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Normalises an optional related-document field: blank becomes `None`.
pub fn normalize_document_ref(reference: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    if reference.chars().count() > MAX_DOCUMENT_REF_LEN {
        return Err(ValidationError::TooLong {
            field: "related document".to_string(),
            max: MAX_DOCUMENT_REF_LEN,
        });
    }

    Ok(Some(reference.to_string()))
}

/// Validates a warehouse / location identifier.
pub fn validate_location_id(field: &str, location: &str) -> ValidationResult<()> {
    if location.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the quantity of a transfer or restock.
///
/// No upper bound: a transfer is limited by the source stock, and restock
/// saturates.
pub fn validate_move_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a VAT rate in basis points (0% to 100%).
pub fn validate_vat_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}
