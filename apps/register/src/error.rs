//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Dukkan POS                             │
//! │                                                                         │
//! │  UI                          Register                                   │
//! │  ──                          ────────                                   │
//! │                                                                         │
//! │  save_invoice()                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function  ->  Result<T, ApiError>                       │  │
//! │  │         │                                                        │  │
//! │  │  CoreError::PaymentRequired ──────────► ApiError ──────────────►│  │
//! │  │  ConfigError::Invalid(..) ────────────► ApiError ──────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "PAYMENT_REQUIRED",                                          │
//! │    "message": "Paid amount is required before saving" }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use dukkan_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for 1 at main: available 100, requested 150"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Drawer entry or opening float not positive
    InvalidAmount,

    /// Transfer larger than the source stock
    InsufficientStock,

    /// Unknown product row, pending invoice or archived invoice
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Save or suspend with no countable line
    EmptyInvoice,

    /// Save before the paid field was filled
    PaymentRequired,

    /// Configuration could not be loaded
    ConfigError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidAmount { .. } => ApiError::new(ErrorCode::InvalidAmount, message),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::ProductNotFound { .. } | CoreError::InvoiceNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, message)
            }
            CoreError::EmptyInvoice => ApiError::new(ErrorCode::EmptyInvoice, message),
            CoreError::PaymentRequired => ApiError::new(ErrorCode::PaymentRequired, message),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use dukkan_core::{Money, ValidationError};

    #[test]
    fn test_core_errors_map_to_codes() {
        let cases = [
            (CoreError::EmptyInvoice, ErrorCode::EmptyInvoice),
            (CoreError::PaymentRequired, ErrorCode::PaymentRequired),
            (CoreError::InvoiceNotFound("p-1".into()), ErrorCode::NotFound),
            (
                CoreError::ProductNotFound {
                    product_id: "1".into(),
                    location: "store".into(),
                },
                ErrorCode::NotFound,
            ),
            (
                CoreError::InvalidAmount {
                    amount: Money::zero(),
                    reason: "must be positive".into(),
                },
                ErrorCode::InvalidAmount,
            ),
            (
                CoreError::Validation(ValidationError::Required {
                    field: "description".into(),
                }),
                ErrorCode::ValidationError,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(ApiError::from(err).code, code);
        }
    }

    #[test]
    fn test_serializes_screaming_snake_code() {
        let err = ApiError::from(CoreError::InsufficientStock {
            product_id: "1".into(),
            location: "main".into(),
            available: 100,
            requested: 150,
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
        assert_eq!(
            json["message"],
            "Insufficient stock for 1 at main: available 100, requested 150"
        );
    }

    #[test]
    fn test_config_error_code() {
        let err = ApiError::from(ConfigError::Invalid("invoice_rows must be at least 1".into()));
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.to_string().contains("invoice_rows"));
    }
}
