//! # Register Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DUKKAN_STORE_NAME="بقالة النور"                                    │
//! │     DUKKAN_VAT_RATE=15                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dukkan-pos/register.toml (Linux)                         │
//! │     ~/Library/Application Support/com.dukkan.pos/register.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     15% VAT, SAR, 11 blank invoice rows                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! store_name = "بقالة النور"
//! currency_code = "SAR"
//! currency_label = "ريال"
//! vat_rate_bps = 1500          # 15%
//! opening_float = 50000        # halalas (500.00)
//! invoice_rows = 11
//! sales_location = "store"
//! storage_location = "main"
//! ```

use std::path::PathBuf;

use dukkan_core::validation::{validate_location_id, validate_vat_rate_bps};
use dukkan_core::invoice::InvoiceCalculator;
use dukkan_core::{Money, TaxRate, DEFAULT_INVOICE_ROWS, DEFAULT_VAT_RATE_BPS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Most blank rows a fresh invoice form may start with.
const MAX_INVOICE_ROWS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Store name (printed on receipts)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Label appended to amounts on screen
    pub currency_label: String,

    /// Decimal places shown on screen (0 to 2). Amounts are always kept in
    /// halalas.
    pub currency_decimals: u8,

    /// VAT rate in basis points, e.g. 1500 = 15%
    pub vat_rate_bps: u32,

    /// Cash in the drawer when the shift starts
    pub opening_float: Money,

    /// Blank rows on a fresh invoice form
    pub invoice_rows: usize,

    /// Location the counter sells from
    pub sales_location: String,

    /// Back-room warehouse that restocks the counter
    pub storage_location: String,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        RegisterConfig {
            store_name: "Dukkan".to_string(),
            currency_code: "SAR".to_string(),
            currency_label: "ريال".to_string(),
            currency_decimals: 2,
            vat_rate_bps: DEFAULT_VAT_RATE_BPS,
            opening_float: Money::zero(),
            invoice_rows: DEFAULT_INVOICE_ROWS,
            sales_location: "store".to_string(),
            storage_location: "main".to_string(),
        }
    }
}

impl RegisterConfig {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load register config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// `register.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dukkan", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `DUKKAN_*` overrides from any key lookup. Unparseable values
    /// are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("DUKKAN_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(code) = lookup("DUKKAN_CURRENCY_CODE") {
            self.currency_code = code;
        }

        if let Some(label) = lookup("DUKKAN_CURRENCY_LABEL") {
            self.currency_label = label;
        }

        // Percentage, e.g. "15" or "15.5"
        if let Some(rate) = lookup("DUKKAN_VAT_RATE") {
            if let Ok(pct) = rate.trim().parse::<f64>() {
                debug!(vat_rate = pct, "Overriding VAT rate from environment");
                self.vat_rate_bps = TaxRate::from_percentage(pct).bps();
            }
        }

        if let Some(amount) = lookup("DUKKAN_OPENING_FLOAT") {
            self.opening_float = Money::parse_lenient(&amount);
        }

        if let Some(rows) = lookup("DUKKAN_INVOICE_ROWS") {
            if let Ok(rows) = rows.trim().parse() {
                self.invoice_rows = rows;
            }
        }

        if let Some(location) = lookup("DUKKAN_SALES_LOCATION") {
            self.sales_location = location;
        }

        if let Some(location) = lookup("DUKKAN_STORAGE_LOCATION") {
            self.storage_location = location;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_vat_rate_bps(self.vat_rate_bps).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate_location_id("sales_location", &self.sales_location)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate_location_id("storage_location", &self.storage_location)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.sales_location == self.storage_location {
            return Err(ConfigError::Invalid(
                "sales_location and storage_location must differ".into(),
            ));
        }

        if self.invoice_rows == 0 || self.invoice_rows > MAX_INVOICE_ROWS {
            return Err(ConfigError::Invalid(format!(
                "invoice_rows must be between 1 and {}",
                MAX_INVOICE_ROWS
            )));
        }

        if self.currency_decimals > 2 {
            return Err(ConfigError::Invalid(
                "currency_decimals must be 0, 1 or 2".into(),
            ));
        }

        if self.opening_float.is_negative() {
            return Err(ConfigError::Invalid("opening_float cannot be negative".into()));
        }

        Ok(())
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn vat_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.vat_rate_bps)
    }

    pub fn calculator(&self) -> InvoiceCalculator {
        InvoiceCalculator::new(self.vat_rate())
    }

    /// Formats an amount for display, e.g. `115.00 ريال`.
    ///
    /// With fewer than two decimals the amount is rounded half away from
    /// zero.
    pub fn format_currency(&self, amount: Money) -> String {
        let drop = 10_i64.pow(2 - self.currency_decimals.min(2) as u32);
        let halalas = amount.halalas();
        let scaled = amount.abs().halalas().saturating_add(drop / 2) / drop;

        let divisor = 10_i64.pow(self.currency_decimals.min(2) as u32);
        let whole = scaled / divisor;
        let frac = scaled % divisor;

        let number = if self.currency_decimals > 0 {
            format!(
                "{}.{:0width$}",
                whole,
                frac,
                width = self.currency_decimals as usize
            )
        } else {
            whole.to_string()
        };

        format!(
            "{}{} {}",
            if halalas < 0 && scaled > 0 { "-" } else { "" },
            number,
            self.currency_label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RegisterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vat_rate().bps(), 1500);
        assert_eq!(config.invoice_rows, 11);
    }

    #[test]
    fn test_format_currency() {
        let config = RegisterConfig::default();
        assert_eq!(config.format_currency(Money::from_halalas(11500)), "115.00 ريال");
        assert_eq!(config.format_currency(Money::from_halalas(5)), "0.05 ريال");
        assert_eq!(config.format_currency(Money::from_halalas(-1234)), "-12.34 ريال");
        assert_eq!(
            config.format_currency(Money::from_halalas(i64::MIN)),
            "-92233720368547758.07 ريال"
        );
    }

    #[test]
    fn test_format_currency_whole_units() {
        let config = RegisterConfig {
            currency_decimals: 0,
            ..RegisterConfig::default()
        };
        assert_eq!(config.format_currency(Money::from_halalas(11550)), "116 ريال");
        assert_eq!(config.format_currency(Money::from_halalas(-11549)), "-115 ريال");
        assert_eq!(config.format_currency(Money::from_halalas(-40)), "0 ريال");
    }

    #[test]
    fn test_parse_toml() {
        let config: RegisterConfig = toml::from_str(
            r#"
            store_name = "بقالة النور"
            vat_rate_bps = 500
            opening_float = 50000
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "بقالة النور");
        assert_eq!(config.vat_rate_bps, 500);
        assert_eq!(config.opening_float, Money::from_halalas(50000));
        // Missing keys fall back to defaults
        assert_eq!(config.currency_code, "SAR");
        assert_eq!(config.invoice_rows, 11);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RegisterConfig::default();
        config.apply_overrides(env(&[
            ("DUKKAN_STORE_NAME", "Corner Shop"),
            ("DUKKAN_VAT_RATE", "5"),
            ("DUKKAN_OPENING_FLOAT", "250.50"),
            ("DUKKAN_INVOICE_ROWS", "not-a-number"),
        ]));

        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.vat_rate_bps, 500);
        assert_eq!(config.opening_float, Money::from_halalas(25050));
        assert_eq!(config.invoice_rows, 11);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let same_locations = RegisterConfig {
            storage_location: "store".into(),
            ..RegisterConfig::default()
        };
        assert!(same_locations.validate().is_err());

        let no_rows = RegisterConfig {
            invoice_rows: 0,
            ..RegisterConfig::default()
        };
        assert!(no_rows.validate().is_err());

        let huge_vat = RegisterConfig {
            vat_rate_bps: 20_000,
            ..RegisterConfig::default()
        };
        assert!(huge_vat.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("dukkan-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = RegisterConfig::load(Some(path)).unwrap();
        assert_eq!(config.currency_code, "SAR");
    }

    #[test]
    fn test_load_or_default_falls_back_on_broken_file() {
        let path = std::env::temp_dir().join(format!("dukkan-broken-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "invoice_rows = \"eleven\"").unwrap();

        assert!(RegisterConfig::load(Some(path.clone())).is_err());
        let config = RegisterConfig::load_or_default(Some(path.clone()));
        assert_eq!(config.invoice_rows, 11);
        assert_eq!(config.currency_decimals, 2);

        std::fs::remove_file(path).unwrap();
    }
}
