//! Cart configuration.

use serde::{Deserialize, Serialize};

/// Storage key holding the cart JSON array.
pub const DEFAULT_CART_KEY: &str = "cart_v1";

/// Storage key holding the last valid postal code.
pub const DEFAULT_POSTAL_CODE_KEY: &str = "user_cep";

/// Quantity cap for items whose stock is not known.
pub const DEFAULT_MAX_QUANTITY: i64 = 999;

/// Settings shared by the cart store and controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key under which the cart is persisted.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    /// Key under which the last postal code is persisted.
    #[serde(default = "default_postal_code_key")]
    pub postal_code_key: String,

    /// Cap applied when an item carries no `max`.
    #[serde(default = "default_max")]
    pub default_max: i64,
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_postal_code_key() -> String {
    DEFAULT_POSTAL_CODE_KEY.to_string()
}

fn default_max() -> i64 {
    DEFAULT_MAX_QUANTITY
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            cart_key: default_cart_key(),
            postal_code_key: default_postal_code_key(),
            default_max: default_max(),
        }
    }
}

impl CartConfig {
    /// Override the cart storage key.
    pub fn with_cart_key(mut self, key: impl Into<String>) -> Self {
        self.cart_key = key.into();
        self
    }

    /// Override the fallback quantity cap. Values below 1 are raised to 1.
    pub fn with_default_max(mut self, max: i64) -> Self {
        self.default_max = max.max(1);
        self
    }
}
