//! Product and variant types.

use serde::{Deserialize, Deserializer};

use crate::ids::{ProductId, VariantId};
use crate::money::{decimal, Currency, Money};

/// A product with its size/color variants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Base price, used when a variant has no override.
    #[serde(default, with = "decimal")]
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// One size/color combination of a product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductVariant {
    #[serde(alias = "id")]
    pub variant_id: VariantId,
    pub size: String,
    pub color: String,
    /// Units in stock.
    #[serde(default)]
    pub quantity: i64,
    /// Price override.
    #[serde(default, deserialize_with = "optional_price")]
    pub price: Option<Money>,
}

fn optional_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|amount| Money::from_decimal(amount, Currency::BRL)))
}

impl ProductVariant {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            variants: Vec::new(),
        }
    }

    pub fn with_variant(
        mut self,
        variant_id: VariantId,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: i64,
    ) -> Self {
        self.variants.push(ProductVariant {
            variant_id,
            size: size.into(),
            color: color.into(),
            quantity,
            price: None,
        });
        self
    }

    /// Distinct sizes, in first-seen order.
    pub fn sizes(&self) -> Vec<&str> {
        distinct(self.variants.iter().map(|v| v.size.as_str()))
    }

    /// Distinct colors, in first-seen order.
    pub fn colors(&self) -> Vec<&str> {
        distinct(self.variants.iter().map(|v| v.color.as_str()))
    }

    /// The variant for a size/color pair, regardless of stock.
    pub fn find_variant(&self, size: &str, color: &str) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.size == size && v.color == color)
    }

    /// Units in stock across all variants.
    pub fn total_stock(&self) -> i64 {
        self.variants.iter().map(|v| v.quantity.max(0)).sum()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
