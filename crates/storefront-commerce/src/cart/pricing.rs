//! Totals and the view model consumed by adapters.

use serde::Serialize;

use crate::cart::{Cart, CartItem};
use crate::checkout::ShippingOption;
use crate::ids::VariantId;
use crate::money::Money;

/// Cart totals for the selected shipping option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub item_count: i64,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn calculate(cart: &Cart, shipping: &ShippingOption) -> Self {
        let subtotal = cart.subtotal();
        let shipping = shipping.cost(cart.currency());
        Self {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub variant_id: VariantId,
    pub name: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit_price: Money,
    pub qty: i64,
    pub max: i64,
    pub line_total: Money,
    /// The increase control is disabled at the cap.
    pub can_increase: bool,
    /// The decrease control is disabled at one.
    pub can_decrease: bool,
}

impl CartLine {
    fn from_item(item: &CartItem, default_max: i64) -> Self {
        let max = item.cap(default_max);
        Self {
            variant_id: item.variant_id,
            name: item.name.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            image: item.image.clone(),
            unit_price: item.price,
            qty: item.qty,
            max,
            line_total: item.line_total(),
            can_increase: item.qty < max,
            can_decrease: item.qty > 1,
        }
    }
}

/// Everything an adapter needs to draw the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub shipping: ShippingOption,
    pub is_empty: bool,
}

impl CartView {
    pub fn build(cart: &Cart, shipping: &ShippingOption) -> Self {
        Self {
            lines: cart
                .items()
                .iter()
                .map(|item| CartLine::from_item(item, cart.default_max()))
                .collect(),
            totals: CartTotals::calculate(cart, shipping),
            shipping: shipping.clone(),
            is_empty: cart.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::ShippingQuote;
    use crate::money::Currency;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(CartItem::new(
            VariantId::new(1),
            "Legging",
            Money::new(5000, Currency::BRL),
            2,
            "M",
        )
        .with_max(2));
        cart
    }

    #[test]
    fn test_totals_with_delivery() {
        let delivery = ShippingOption::Delivery(ShippingQuote {
            cost: Money::new(1550, Currency::BRL),
            distance_km: 3.0,
            message: None,
        });
        let totals = CartTotals::calculate(&cart(), &delivery);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.subtotal.display(), "R$ 100,00");
        assert_eq!(totals.total.display(), "R$ 115,50");

        let pickup = CartTotals::calculate(&cart(), &ShippingOption::Pickup);
        assert_eq!(pickup.total, pickup.subtotal);
    }

    #[test]
    fn test_view_controls() {
        let view = CartView::build(&cart(), &ShippingOption::Pickup);
        assert!(!view.is_empty);
        let line = &view.lines[0];
        assert!(!line.can_increase);
        assert!(line.can_decrease);
        assert_eq!(line.line_total.amount_cents, 10000);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::build(&Cart::new(), &ShippingOption::Pickup);
        assert!(view.is_empty);
        assert!(view.totals.total.is_zero());
    }
}
