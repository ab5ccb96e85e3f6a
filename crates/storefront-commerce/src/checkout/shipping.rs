//! Shipping options.

use serde::Serialize;

use crate::money::{Currency, Money};

/// A delivery quote returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingQuote {
    pub cost: Money,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The shipping choice applied to the cart total.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ShippingOption {
    /// Collect in store. Always available, free.
    #[default]
    Pickup,
    /// Delivery at the quoted cost.
    Delivery(ShippingQuote),
}

impl ShippingOption {
    /// Cost added to the subtotal.
    pub fn cost(&self, currency: Currency) -> Money {
        match self {
            ShippingOption::Pickup => Money::zero(currency),
            ShippingOption::Delivery(quote) => quote.cost,
        }
    }

    /// Machine name of the option.
    pub fn code(&self) -> &'static str {
        match self {
            ShippingOption::Pickup => "pickup",
            ShippingOption::Delivery(_) => "delivery",
        }
    }

    /// Display label, e.g. `Delivery (12.3 km) R$ 15,50`.
    pub fn label(&self) -> String {
        match self {
            ShippingOption::Pickup => "Store pickup (free)".to_string(),
            ShippingOption::Delivery(quote) => {
                format!("Delivery ({:.1} km) {}", quote.distance_km, quote.cost)
            }
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, ShippingOption::Delivery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_is_free() {
        assert!(ShippingOption::Pickup.cost(Currency::BRL).is_zero());
        assert_eq!(ShippingOption::default(), ShippingOption::Pickup);
    }

    #[test]
    fn test_delivery_label() {
        let option = ShippingOption::Delivery(ShippingQuote {
            cost: Money::new(1550, Currency::BRL),
            distance_km: 12.34,
            message: None,
        });
        assert_eq!(option.code(), "delivery");
        assert_eq!(option.label(), "Delivery (12.3 km) R$ 15,50");
    }
}
