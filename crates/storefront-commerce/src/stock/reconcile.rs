//! Bringing a cart in line with remote stock.

use crate::cart::{Cart, CartItem};
use crate::stock::StockLevels;

/// A line whose quantity was lowered to the remaining stock.
#[derive(Debug, Clone, PartialEq)]
pub struct StockAdjustment {
    pub item: CartItem,
    pub previous_qty: i64,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The adjusted cart.
    pub cart: Cart,
    /// Lines dropped because the variant is out of stock or unknown.
    pub removed: Vec<CartItem>,
    /// Lines whose quantity was clamped down.
    pub clamped: Vec<StockAdjustment>,
}

impl Reconciliation {
    /// Whether the adjusted cart differs in a way that must be persisted.
    ///
    /// Refreshing `max` alone only affects the view.
    pub fn needs_persist(&self) -> bool {
        !self.removed.is_empty() || !self.clamped.is_empty()
    }
}

/// Apply remote stock to every line of `cart`.
///
/// Per line: stock zero, negative or unknown drops it; stock below the
/// quantity clamps both `qty` and `max` to the stock; otherwise `max` is set
/// to the stock. Applying the same levels twice changes nothing the second
/// time.
pub fn reconcile(cart: &Cart, stock: &StockLevels) -> Reconciliation {
    let mut kept = Vec::with_capacity(cart.len());
    let mut removed = Vec::new();
    let mut clamped = Vec::new();

    for item in cart.items() {
        let available = match stock.get(item.variant_id) {
            Some(qty) if qty > 0 => qty,
            _ => {
                removed.push(item.clone());
                continue;
            }
        };

        let mut item = item.clone();
        item.max = Some(available);
        if available < item.qty {
            let previous_qty = item.qty;
            item.qty = available;
            clamped.push(StockAdjustment {
                item: item.clone(),
                previous_qty,
            });
        }
        kept.push(item);
    }

    let mut adjusted = cart.clone();
    adjusted.replace_items(kept);

    Reconciliation {
        cart: adjusted,
        removed,
        clamped,
    }
}
