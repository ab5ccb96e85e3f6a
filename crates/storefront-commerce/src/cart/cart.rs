//! Cart state and quantity operations.

use crate::cart::CartItem;
use crate::config::DEFAULT_MAX_QUANTITY;
use crate::ids::VariantId;
use crate::money::{Currency, Money};

/// Result of a quantity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The quantity moved from one value to another.
    Changed { from: i64, to: i64 },
    /// The clamped result equals the current quantity.
    Unchanged,
    /// An increase was requested while already at the cap.
    LimitReached { max: i64 },
    /// No line with that key.
    NotFound,
}

impl QuantityChange {
    /// Whether the cart must be persisted after this change.
    pub fn is_changed(&self) -> bool {
        matches!(self, QuantityChange::Changed { .. })
    }
}

/// Result of adding an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Appended { qty: i64 },
    /// Quantities were summed into an existing line.
    Merged { qty: i64 },
}

/// An ordered list of cart lines.
///
/// Lines keep insertion order. The only uniqueness rule is that
/// [`Cart::add_item`] merges into an existing line with the same variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    default_max: i64,
    currency: Currency,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            default_max: DEFAULT_MAX_QUANTITY,
            currency: Currency::BRL,
        }
    }

    /// Set the cap used for items with no known stock.
    pub fn with_default_max(mut self, default_max: i64) -> Self {
        self.default_max = default_max.max(1);
        for item in &mut self.items {
            item.normalize(self.default_max);
        }
        self
    }

    /// Build a cart from stored items, normalizing each one.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for mut item in items {
            item.normalize(cart.default_max);
            cart.items.push(item);
        }
        cart
    }

    /// The lines, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart, returning its lines.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// The cap applied to items with no known stock.
    pub fn default_max(&self) -> i64 {
        self.default_max
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Get a line by variant.
    pub fn get(&self, key: VariantId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.variant_id == key)
    }

    /// Variant ids of all lines, in order.
    pub fn variant_ids(&self) -> Vec<VariantId> {
        self.items.iter().map(|i| i.variant_id).collect()
    }

    /// Set an exact quantity, clamped into `[1, max]`.
    pub fn set_quantity(&mut self, key: VariantId, qty: i64) -> QuantityChange {
        let default_max = self.default_max;
        let Some(item) = self.items.iter_mut().find(|i| i.variant_id == key) else {
            return QuantityChange::NotFound;
        };

        let from = item.qty;
        let to = item.clamp_qty(qty, default_max);
        if from == to {
            return QuantityChange::Unchanged;
        }
        item.qty = to;
        QuantityChange::Changed { from, to }
    }

    /// Move a quantity by `delta`, clamped into `[1, max]`.
    ///
    /// Increasing while already at the cap reports [`QuantityChange::LimitReached`]
    /// and leaves the line untouched.
    pub fn change_quantity(&mut self, key: VariantId, delta: i64) -> QuantityChange {
        let default_max = self.default_max;
        let Some(item) = self.items.iter_mut().find(|i| i.variant_id == key) else {
            return QuantityChange::NotFound;
        };

        let from = item.qty;
        let cap = item.cap(default_max);
        let to = item.clamp_qty(from.saturating_add(delta), default_max);
        if from == to {
            if delta > 0 && to == cap {
                return QuantityChange::LimitReached { max: cap };
            }
            return QuantityChange::Unchanged;
        }
        item.qty = to;
        QuantityChange::Changed { from, to }
    }

    /// Remove a line. Returns the removed item, or `None` if absent.
    pub fn remove_item(&mut self, key: VariantId) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.variant_id == key)?;
        Some(self.items.remove(index))
    }

    /// Add an item, merging into an existing line with the same variant.
    ///
    /// On merge the quantities are summed and clamped to the cap; a `max`
    /// carried by the incoming item replaces the stored one.
    pub fn add_item(&mut self, mut item: CartItem) -> AddOutcome {
        let default_max = self.default_max;
        item.normalize(default_max);

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.variant_id == item.variant_id)
        {
            if item.max.is_some() {
                existing.max = item.max;
            }
            existing.qty = existing.qty.saturating_add(item.qty);
            existing.normalize(default_max);
            return AddOutcome::Merged { qty: existing.qty };
        }

        let qty = item.qty;
        self.items.push(item);
        AddOutcome::Appended { qty }
    }

    /// Replace all lines, normalizing each one.
    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
        let default_max = self.default_max;
        for item in &mut self.items {
            item.normalize(default_max);
        }
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.qty).sum()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        let totals: Vec<Money> = self.items.iter().map(CartItem::line_total).collect();
        Money::sum(totals.iter(), self.currency)
    }
}
