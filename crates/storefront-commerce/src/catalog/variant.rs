//! Size/color selection for a product page.

use tracing::debug;

use crate::cart::CartItem;
use crate::catalog::{Product, ProductVariant};
use crate::error::CommerceError;
use crate::ids::VariantId;
use crate::money::Money;

/// A selectable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Size,
    Color,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Size => "size",
            Dimension::Color => "color",
        }
    }
}

/// Where the selection stands after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// The other dimension has not been chosen yet.
    Incomplete,
    /// The other dimension was deselected because the pair has no stock.
    Cleared(Dimension),
    /// Both dimensions point at an in-stock variant.
    Ready { variant_id: VariantId, stock: i64 },
}

/// Whether an option can be picked given the other dimension's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub value: String,
    pub available: bool,
}

/// Quantity input bound to the selected variant's stock.
///
/// Disabled until a valid variant is selected. While enabled the value stays
/// within `[1, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityControl {
    value: i64,
    max: i64,
    enabled: bool,
}

impl Default for QuantityControl {
    fn default() -> Self {
        Self {
            value: 1,
            max: 0,
            enabled: false,
        }
    }
}

impl QuantityControl {
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Stock of the selected variant, zero while disabled.
    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn increment(&mut self) {
        if self.enabled && self.value < self.max {
            self.value += 1;
        }
    }

    pub fn decrement(&mut self) {
        if self.enabled && self.value > 1 {
            self.value -= 1;
        }
    }

    /// Set a typed value, clamped into `[1, max]`.
    pub fn set(&mut self, value: i64) {
        if self.enabled {
            self.value = value.clamp(1, self.max.max(1));
        }
    }

    fn enable(&mut self, max: i64) {
        self.max = max;
        self.enabled = true;
        self.value = self.value.clamp(1, max.max(1));
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Tracks the shopper's size and color choice for one product.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    product: Product,
    size: Option<String>,
    color: Option<String>,
    quantity: QuantityControl,
}

impl VariantSelector {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            size: None,
            color: None,
            quantity: QuantityControl::default(),
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn quantity(&self) -> &QuantityControl {
        &self.quantity
    }

    pub fn quantity_mut(&mut self) -> &mut QuantityControl {
        &mut self.quantity
    }

    /// Choose a size. A chosen color with no stock in that size is cleared.
    pub fn select_size(&mut self, size: impl Into<String>) -> SelectionState {
        self.size = Some(size.into());
        self.refresh(Dimension::Color)
    }

    /// Choose a color. A chosen size with no stock in that color is cleared.
    pub fn select_color(&mut self, color: impl Into<String>) -> SelectionState {
        self.color = Some(color.into());
        self.refresh(Dimension::Size)
    }

    /// Re-evaluate after a change; `other` is the dimension that was not touched.
    fn refresh(&mut self, other: Dimension) -> SelectionState {
        let (Some(size), Some(color)) = (self.size.as_deref(), self.color.as_deref()) else {
            self.quantity.reset();
            return SelectionState::Incomplete;
        };

        let ready = self
            .product
            .find_variant(size, color)
            .filter(|v| v.in_stock())
            .map(|v| (v.variant_id, v.quantity));

        match ready {
            Some((variant_id, stock)) => {
                self.quantity.enable(stock);
                SelectionState::Ready { variant_id, stock }
            }
            None => {
                debug!(size = %size, color = %color, "pair unavailable, clearing {}", other.as_str());
                match other {
                    Dimension::Size => self.size = None,
                    Dimension::Color => self.color = None,
                }
                self.quantity.reset();
                SelectionState::Cleared(other)
            }
        }
    }

    /// Colors and whether each has stock in the selected size.
    ///
    /// With no size chosen, a color is available if any size has stock.
    pub fn available_colors(&self) -> Vec<Availability> {
        self.product
            .colors()
            .into_iter()
            .map(|color| Availability {
                value: color.to_string(),
                available: self.product.variants.iter().any(|v| {
                    v.color == color && v.in_stock() && self.size.as_ref().map_or(true, |s| &v.size == s)
                }),
            })
            .collect()
    }

    /// Sizes and whether each has stock in the selected color.
    pub fn available_sizes(&self) -> Vec<Availability> {
        self.product
            .sizes()
            .into_iter()
            .map(|size| Availability {
                value: size.to_string(),
                available: self.product.variants.iter().any(|v| {
                    v.size == size && v.in_stock() && self.color.as_ref().map_or(true, |c| &v.color == c)
                }),
            })
            .collect()
    }

    /// The selected in-stock variant, if any.
    pub fn selected_variant(&self) -> Option<&ProductVariant> {
        let variant = self
            .product
            .find_variant(self.size.as_deref()?, self.color.as_deref()?)?;
        variant.in_stock().then_some(variant)
    }

    /// Price to show: the variant override, else the product price.
    pub fn price(&self) -> Money {
        self.selected_variant()
            .and_then(|v| v.price)
            .unwrap_or(self.product.price)
    }

    /// Build a cart item for the current selection and quantity.
    pub fn to_cart_item(&self) -> Result<CartItem, CommerceError> {
        let size = self
            .size
            .as_deref()
            .ok_or(CommerceError::SelectionIncomplete(Dimension::Size.as_str()))?;
        let color = self
            .color
            .as_deref()
            .ok_or(CommerceError::SelectionIncomplete(Dimension::Color.as_str()))?;

        let variant = self
            .product
            .find_variant(size, color)
            .filter(|v| v.in_stock())
            .ok_or_else(|| CommerceError::VariantUnavailable {
                size: size.to_string(),
                color: color.to_string(),
            })?;

        let qty = self.quantity.value();
        if qty > variant.quantity {
            return Err(CommerceError::InsufficientStock {
                variant_id: variant.variant_id.to_string(),
                requested: qty,
                available: variant.quantity,
            });
        }

        let mut item = CartItem::new(
            variant.variant_id,
            self.product.name.clone(),
            variant.price.unwrap_or(self.product.price),
            qty,
            size,
        )
        .with_product(self.product.id)
        .with_color(color)
        .with_max(variant.quantity);
        if let Some(image) = &self.product.image {
            item = item.with_image(image.clone());
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;
    use crate::money::Currency;

    fn product() -> Product {
        let mut product = Product::new(
            ProductId::new(1),
            "Legging",
            Money::new(8990, Currency::BRL),
        )
        .with_variant(VariantId::new(10), "P", "Preto", 3)
        .with_variant(VariantId::new(11), "M", "Preto", 0)
        .with_variant(VariantId::new(12), "M", "Azul", 5);
        product.variants[2].price = Some(Money::new(9990, Currency::BRL));
        product
    }

    #[test]
    fn test_incomplete_until_both_chosen() {
        let mut selector = VariantSelector::new(product());
        assert_eq!(selector.select_size("P"), SelectionState::Incomplete);
        assert!(!selector.quantity().is_enabled());
    }

    #[test]
    fn test_ready_enables_quantity() {
        let mut selector = VariantSelector::new(product());
        selector.select_size("P");
        let state = selector.select_color("Preto");
        assert_eq!(
            state,
            SelectionState::Ready {
                variant_id: VariantId::new(10),
                stock: 3
            }
        );
        assert!(selector.quantity().is_enabled());
        assert_eq!(selector.quantity().max(), 3);
    }

    #[test]
    fn test_size_change_clears_unavailable_color() {
        let mut selector = VariantSelector::new(product());
        selector.select_size("P");
        selector.select_color("Preto");

        // M/Preto exists but has no stock.
        assert_eq!(
            selector.select_size("M"),
            SelectionState::Cleared(Dimension::Color)
        );
        assert_eq!(selector.color(), None);
        assert_eq!(selector.size(), Some("M"));
        assert!(!selector.quantity().is_enabled());
    }

    #[test]
    fn test_color_change_clears_unavailable_size() {
        let mut selector = VariantSelector::new(product());
        selector.select_color("Preto");
        selector.select_size("P");

        assert_eq!(
            selector.select_color("Azul"),
            SelectionState::Cleared(Dimension::Size)
        );
        assert_eq!(selector.size(), None);
    }

    #[test]
    fn test_availability() {
        let mut selector = VariantSelector::new(product());
        selector.select_size("M");
        let colors = selector.available_colors();
        assert_eq!(
            colors,
            vec![
                Availability { value: "Preto".into(), available: false },
                Availability { value: "Azul".into(), available: true },
            ]
        );

        let sizes = VariantSelector::new(product()).available_sizes();
        assert!(sizes.iter().all(|s| s.available));
    }

    #[test]
    fn test_quantity_clamped_to_stock() {
        let mut selector = VariantSelector::new(product());
        selector.select_size("M");
        selector.select_color("Azul");

        let qty = selector.quantity_mut();
        qty.set(50);
        assert_eq!(qty.value(), 5);
        qty.increment();
        assert_eq!(qty.value(), 5);
        qty.set(-4);
        assert_eq!(qty.value(), 1);
        qty.decrement();
        assert_eq!(qty.value(), 1);

        // Losing the pair resets the control.
        selector.select_size("P");
        assert!(!selector.quantity().is_enabled());
        assert_eq!(selector.quantity().value(), 1);
    }

    #[test]
    fn test_disabled_control_ignores_input() {
        let mut selector = VariantSelector::new(product());
        selector.quantity_mut().increment();
        selector.quantity_mut().set(4);
        assert_eq!(selector.quantity().value(), 1);
    }

    #[test]
    fn test_price_override() {
        let mut selector = VariantSelector::new(product());
        assert_eq!(selector.price().amount_cents, 8990);
        selector.select_size("M");
        selector.select_color("Azul");
        assert_eq!(selector.price().amount_cents, 9990);
    }

    #[test]
    fn test_to_cart_item() {
        let mut selector = VariantSelector::new(product());
        assert!(matches!(
            selector.to_cart_item(),
            Err(CommerceError::SelectionIncomplete("size"))
        ));

        selector.select_size("M");
        selector.select_color("Azul");
        selector.quantity_mut().set(2);
        let item = selector.to_cart_item().unwrap();
        assert_eq!(item.variant_id, VariantId::new(12));
        assert_eq!(item.product_id, Some(ProductId::new(1)));
        assert_eq!(item.qty, 2);
        assert_eq!(item.max, Some(5));
        assert_eq!(item.color.as_deref(), Some("Azul"));
        assert_eq!(item.price.amount_cents, 9990);
    }

    #[test]
    fn test_to_cart_item_missing_color() {
        let mut selector = VariantSelector::new(product());
        selector.select_size("P");
        assert!(matches!(
            selector.to_cart_item(),
            Err(CommerceError::SelectionIncomplete("color"))
        ));
    }
}
