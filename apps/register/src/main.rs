//! # Offline Checkout
//!
//! Runs the save path of one invoice against a catalog snapshot and prints
//! the result as JSON.
//!
//! ## Usage
//! ```bash
//! dukkan-register checkout --catalog products.json --invoice draft.json
//!
//! # Drawer starting at 500.00
//! dukkan-register checkout --catalog products.json --invoice draft.json --opening-float 500
//! ```
//!
//! ## Input Files
//! ```text
//! products.json   [{ "id": "1", "name": "شاي", "quantity": 10,
//!                    "price": 500, "warehouseId": "store" }]
//! draft.json      { "rows": [{ "name": "شاي", "quantity": "2", "unitPrice": "5" }],
//!                   "discount": "", "paid": "20" }
//! ```
//!
//! ## Output
//! `{ invoice, warnings, catalog, drawerBalance, currency, totalDisplay,
//! changeDisplay }` on stdout; the catalog is the snapshot to write back.
//!
//! An explicit `--config` must load cleanly. Without it, a broken
//! `register.toml` in the config directory is logged and defaults are used.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use dukkan_core::{Money, Product};
use dukkan_register::state::RegisterConfig;
use dukkan_register::{checkout, init_tracing, CheckoutInput, Register};
use tracing::{error, warn};

fn print_help() {
    println!("Dukkan POS offline checkout");
    println!();
    println!("Usage: dukkan-register checkout [OPTIONS]");
    println!();
    println!("Options:");
    println!("      --catalog <PATH>         Product snapshot (JSON array)");
    println!("      --invoice <PATH>         Invoice form (JSON)");
    println!("      --opening-float <AMOUNT> Cash in the drawer before the sale");
    println!("      --config <PATH>          register.toml to use");
    println!("  -h, --help                   Show this help message");
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut catalog_path: Option<PathBuf> = None;
    let mut invoice_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut opening_float: Option<Money> = None;

    if args.get(1).map(String::as_str) != Some("checkout") {
        print_help();
        return Ok(());
    }

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                catalog_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--invoice" if i + 1 < args.len() => {
                invoice_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--opening-float" if i + 1 < args.len() => {
                opening_float = Some(Money::parse_lenient(&args[i + 1]));
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let (Some(catalog_path), Some(invoice_path)) = (catalog_path, invoice_path) else {
        print_help();
        bail!("--catalog and --invoice are required");
    };

    let mut config = match config_path {
        Some(path) => RegisterConfig::load(Some(path))?,
        None => RegisterConfig::load_or_default(None),
    };
    if let Some(amount) = opening_float {
        config.opening_float = amount;
        config.validate()?;
    }

    let products: Vec<Product> = read_json(&catalog_path)?;
    let input: CheckoutInput = read_json(&invoice_path)?;

    let register = Register::new(config);
    match checkout(&register, products, input) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(err) => {
            error!(code = ?err.code, "Checkout failed: {}", err.message);
            println!("{}", serde_json::to_string_pretty(&err)?);
            Err(err.into())
        }
    }
}
