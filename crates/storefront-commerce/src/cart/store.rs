//! Cart persistence with observer notification.

use storefront_cache::{Cache, FallbackBackend};
use tracing::{debug, warn};

use crate::cart::{AddOutcome, Cart, CartEvent, CartItem};
use crate::checkout::PostalCode;
use crate::config::CartConfig;
use crate::ids::VariantId;

type Observer = Box<dyn Fn(&Cart) + Send + Sync>;

/// Reads and writes the cart under one storage key.
///
/// Every operation fails soft: an absent or malformed entry loads as an empty
/// cart, and a failed write is logged and dropped (wrap the backend in a
/// [`FallbackBackend`] to keep the data in memory instead). Observers run
/// after every successful save.
pub struct CartStore {
    cache: Cache,
    config: CartConfig,
    observers: Vec<Observer>,
}

impl CartStore {
    /// Create a store over a cache.
    pub fn new(cache: Cache, config: CartConfig) -> Self {
        Self {
            cache,
            config,
            observers: Vec::new(),
        }
    }

    /// A store with no persistence, for tests and storage-less environments.
    pub fn in_memory() -> Self {
        Self::new(
            Cache::new(FallbackBackend::memory_only()),
            CartConfig::default(),
        )
    }

    /// Store configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Register a callback run after every successful save.
    pub fn subscribe(&mut self, observer: impl Fn(&Cart) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Load the cart.
    ///
    /// Entries that do not parse as cart items are skipped; everything else
    /// is normalized into `1 <= qty <= max`.
    pub fn load(&self) -> Cart {
        let empty = Cart::new().with_default_max(self.config.default_max);

        let raw = match self.cache.get_raw(&self.config.cart_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return empty,
            Err(e) => {
                warn!(key = %self.config.cart_key, error = %e, "failed to read cart, starting empty");
                return empty;
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(key = %self.config.cart_key, error = %e, "malformed cart state, starting empty");
                return empty;
            }
        };

        let mut items = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<CartItem>(value) {
                Ok(item) => items.push(item),
                Err(e) => warn!(error = %e, "dropping unreadable cart entry"),
            }
        }

        let mut cart = empty;
        cart.replace_items(items);
        cart
    }

    /// Persist the cart and notify observers.
    ///
    /// Observers are skipped when the write fails.
    pub fn save(&self, cart: &Cart) {
        if let Err(e) = self.cache.set(&self.config.cart_key, &cart.items()) {
            warn!(key = %self.config.cart_key, error = %e, "failed to persist cart");
            return;
        }
        debug!(lines = cart.len(), items = cart.item_count(), "cart saved");
        for observer in &self.observers {
            observer(cart);
        }
    }

    /// Set an exact quantity on a line.
    ///
    /// Persists only when the clamped quantity differs from the current one.
    pub fn set_quantity(&self, key: VariantId, qty: i64) -> Option<CartEvent> {
        let mut cart = self.load();
        let change = cart.set_quantity(key, qty);
        if change.is_changed() {
            self.save(&cart);
        }
        CartEvent::from_quantity_change(cart.get(key)?, change)
    }

    /// Move a line's quantity by `delta`.
    ///
    /// At the cap this reports [`CartEvent::LimitReached`] and does not persist.
    pub fn change_quantity(&self, key: VariantId, delta: i64) -> Option<CartEvent> {
        let mut cart = self.load();
        let change = cart.change_quantity(key, delta);
        if change.is_changed() {
            self.save(&cart);
        }
        CartEvent::from_quantity_change(cart.get(key)?, change)
    }

    /// Remove a line. A missing key is a no-op.
    pub fn remove_item(&self, key: VariantId) -> Option<CartEvent> {
        let mut cart = self.load();
        let removed = cart.remove_item(key)?;
        self.save(&cart);
        Some(CartEvent::Removed {
            label: removed.label(),
        })
    }

    /// Add an item, merging with an existing line for the same variant.
    pub fn add_item(&self, item: CartItem) -> CartEvent {
        let mut cart = self.load();
        let label = item.label();
        let qty = match cart.add_item(item) {
            AddOutcome::Appended { qty } | AddOutcome::Merged { qty } => qty,
        };
        self.save(&cart);
        CartEvent::Added { label, qty }
    }

    /// Empty the cart.
    pub fn clear(&self) {
        let mut cart = self.load();
        cart.clear();
        self.save(&cart);
    }

    /// Total item count of the stored cart.
    pub fn item_count(&self) -> i64 {
        self.load().item_count()
    }

    /// The last postal code that passed validation, if any.
    pub fn last_postal_code(&self) -> Option<PostalCode> {
        match self.cache.get_raw(&self.config.postal_code_key) {
            Ok(Some(raw)) => PostalCode::parse(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read saved postal code");
                None
            }
        }
    }

    /// Remember a postal code for automatic replay on the next load.
    pub fn remember_postal_code(&self, postal_code: &PostalCode) {
        if let Err(e) = self
            .cache
            .set_raw(&self.config.postal_code_key, postal_code.as_str())
        {
            warn!(error = %e, "failed to persist postal code");
        }
    }
}
