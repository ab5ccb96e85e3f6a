//! Notifications produced by cart operations.

use crate::cart::{CartItem, QuantityChange};

/// Severity of a notification, for styling by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Success,
    Update,
    Warning,
}

/// Something the shopper should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A line's quantity went up or down.
    QuantityChanged {
        label: String,
        qty: i64,
        increased: bool,
    },
    /// An increase was refused because the line is at its cap.
    LimitReached { name: String, max: i64 },
    /// A line was added or merged.
    Added { label: String, qty: i64 },
    /// The shopper removed a line.
    Removed { label: String },
    /// Reconciliation dropped a line that is no longer in stock.
    OutOfStock { label: String },
    /// Reconciliation lowered a line's quantity to the remaining stock.
    StockAdjusted { label: String, qty: i64 },
}

impl CartEvent {
    /// Event for a quantity operation on `item`, if the shopper should hear about it.
    pub fn from_quantity_change(item: &CartItem, change: QuantityChange) -> Option<Self> {
        match change {
            QuantityChange::Changed { from, to } => Some(CartEvent::QuantityChanged {
                label: item.label(),
                qty: to,
                increased: to > from,
            }),
            QuantityChange::LimitReached { max } => Some(CartEvent::LimitReached {
                name: item.name.clone(),
                max,
            }),
            QuantityChange::Unchanged | QuantityChange::NotFound => None,
        }
    }

    /// Notification severity.
    pub fn level(&self) -> EventLevel {
        match self {
            CartEvent::QuantityChanged { .. } | CartEvent::StockAdjusted { .. } => {
                EventLevel::Update
            }
            CartEvent::Added { .. } | CartEvent::Removed { .. } => EventLevel::Success,
            CartEvent::LimitReached { .. } | CartEvent::OutOfStock { .. } => EventLevel::Warning,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match self {
            CartEvent::QuantityChanged {
                label,
                qty,
                increased,
            } => {
                let verb = if *increased { "increased" } else { "decreased" };
                format!("Quantity {}: {} - {} un.", verb, label, qty)
            }
            CartEvent::LimitReached { name, max } => {
                format!("Maximum quantity reached for {} ({} un.)", name, max)
            }
            CartEvent::Added { label, qty } => format!("Added to cart: {} - {} un.", label, qty),
            CartEvent::Removed { label } => format!("Product removed: {}", label),
            CartEvent::OutOfStock { label } => {
                format!("{} was removed - out of stock", label)
            }
            CartEvent::StockAdjusted { label, qty } => {
                format!("Only {} un. of {} left in stock", qty, label)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::VariantId;
    use crate::money::{Currency, Money};

    fn top() -> CartItem {
        CartItem::new(VariantId::new(3), "Top", Money::new(5990, Currency::BRL), 2, "P")
    }

    #[test]
    fn test_quantity_change_events() {
        let event =
            CartEvent::from_quantity_change(&top(), QuantityChange::Changed { from: 1, to: 2 })
                .unwrap();
        assert_eq!(event.message(), "Quantity increased: Top (P) - 2 un.");
        assert_eq!(event.level(), EventLevel::Update);

        let event =
            CartEvent::from_quantity_change(&top(), QuantityChange::LimitReached { max: 2 })
                .unwrap();
        assert_eq!(event.level(), EventLevel::Warning);

        assert_eq!(
            CartEvent::from_quantity_change(&top(), QuantityChange::Unchanged),
            None
        );
    }

    #[test]
    fn test_out_of_stock_message() {
        let event = CartEvent::OutOfStock { label: top().label() };
        assert_eq!(event.message(), "Top (P) was removed - out of stock");
    }
}
