//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::config::{
    CartConfig, DEFAULT_CART_KEY, DEFAULT_MAX_QUANTITY, DEFAULT_POSTAL_CODE_KEY,
};

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart rules.
    #[serde(default)]
    pub cart: CartSection,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Settings for the cart store.
    pub fn cart_config(&self) -> CartConfig {
        CartConfig {
            cart_key: self.storage.cart_key.clone(),
            postal_code_key: self.storage.postal_code_key.clone(),
            default_max: self.cart.default_max.max(1),
        }
    }
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where the cart state lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file, relative to the working directory.
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// Key holding the cart.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    /// Key holding the last postal code.
    #[serde(default = "default_postal_code_key")]
    pub postal_code_key: String,
}

fn default_storage_path() -> String {
    ".storefront/state.json".to_string()
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_postal_code_key() -> String {
    DEFAULT_POSTAL_CODE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            cart_key: default_cart_key(),
            postal_code_key: default_postal_code_key(),
        }
    }
}

/// Cart rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSection {
    /// Quantity cap for items with unknown stock.
    #[serde(default = "default_max")]
    pub default_max: i64,
}

fn default_max() -> i64 {
    DEFAULT_MAX_QUANTITY
}

impl Default for CartSection {
    fn default() -> Self {
        Self {
            default_max: default_max(),
        }
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront CLI configuration

[api]
base_url = "{base_url}"

[storage]
path = "{path}"
cart_key = "{cart_key}"
postal_code_key = "{postal_code_key}"

[cart]
# Cap for items whose stock is unknown
default_max = {default_max}
"#,
        base_url = default_base_url(),
        path = default_storage_path(),
        cart_key = DEFAULT_CART_KEY,
        postal_code_key = DEFAULT_POSTAL_CODE_KEY,
        default_max = DEFAULT_MAX_QUANTITY,
    )
}
