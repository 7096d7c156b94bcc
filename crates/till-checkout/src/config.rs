//! # Checkout Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     TILL_STORE_NAME="Downtown Branch"                                   │
//! │     TILL_REQUIRE_PAYMENT_REFERENCE=false                                │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/till-pos/checkout.toml (Linux)                            │
//! │     ~/Library/Application Support/com.till.pos/checkout.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [store]
//! name = "Downtown Branch"
//!
//! [cart]
//! max_lines = 100
//! max_item_quantity = 999
//!
//! [checkout]
//! require_payment_reference = true
//! refresh_catalog_after_sale = true
//!
//! [catalog]
//! search_limit = 50
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use till_core::{CartLimits, MAX_CART_LINES, MAX_ITEM_QUANTITY};

use crate::error::{ConfigError, ConfigResult};

/// Upper bound for `catalog.search_limit`.
pub const MAX_SEARCH_LIMIT: usize = 500;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Printed at the top of the receipt.
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Till Store".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: i64,
}

fn default_max_lines() -> usize {
    MAX_CART_LINES
}

fn default_max_item_quantity() -> i64 {
    MAX_ITEM_QUANTITY
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            max_lines: default_max_lines(),
            max_item_quantity: default_max_item_quantity(),
        }
    }
}

impl CartSettings {
    pub fn limits(&self) -> CartLimits {
        CartLimits {
            max_lines: self.max_lines,
            max_item_quantity: self.max_item_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Non-cash payments must carry a reference before submission.
    #[serde(default = "default_true")]
    pub require_payment_reference: bool,

    /// Re-run the last catalog search after a completed sale.
    #[serde(default = "default_true")]
    pub refresh_catalog_after_sale: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            require_payment_reference: true,
            refresh_catalog_after_sale: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Most entries kept from one search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

fn default_search_limit() -> usize {
    50
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            search_limit: default_search_limit(),
        }
    }
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl CheckoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
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
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Save("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Save(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::Save(e.to_string()))?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.cart.max_lines == 0 {
            return Err(ConfigError::Invalid(
                "cart.max_lines must be greater than 0".into(),
            ));
        }

        if self.cart.max_item_quantity <= 0 {
            return Err(ConfigError::Invalid(
                "cart.max_item_quantity must be greater than 0".into(),
            ));
        }

        if self.catalog.search_limit == 0 || self.catalog.search_limit > MAX_SEARCH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "catalog.search_limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("TILL_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Ok(value) = std::env::var("TILL_REQUIRE_PAYMENT_REFERENCE") {
            match parse_bool(&value) {
                Some(b) => self.checkout.require_payment_reference = b,
                None => warn!(value = %value, "Ignoring TILL_REQUIRE_PAYMENT_REFERENCE"),
            }
        }

        if let Ok(value) = std::env::var("TILL_REFRESH_AFTER_SALE") {
            match parse_bool(&value) {
                Some(b) => self.checkout.refresh_catalog_after_sale = b,
                None => warn!(value = %value, "Ignoring TILL_REFRESH_AFTER_SALE"),
            }
        }

        if let Ok(limit) = std::env::var("TILL_SEARCH_LIMIT") {
            if let Ok(n) = limit.parse::<usize>() {
                self.catalog.search_limit = n;
            }
        }

        if let Ok(lines) = std::env::var("TILL_MAX_CART_LINES") {
            if let Ok(n) = lines.parse::<usize>() {
                self.cart.max_lines = n;
            }
        }

        if let Ok(qty) = std::env::var("TILL_MAX_ITEM_QUANTITY") {
            if let Ok(n) = qty.parse::<i64>() {
                self.cart.max_item_quantity = n;
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
