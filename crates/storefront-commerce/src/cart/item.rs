//! Cart line item.

use serde::{Deserialize, Serialize};

use crate::ids::{ProductId, VariantId};
use crate::money::{decimal, Money};

/// One line in the cart.
///
/// The persisted shape is the storefront's JSON record:
/// `{"variant_id":12,"name":"Legging","price":89.9,"qty":2,"size":"M","max":5}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Variant being purchased. Identity key of the line.
    #[serde(alias = "variantId", deserialize_with = "integer::variant_id")]
    pub variant_id: VariantId,
    /// Parent product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Product name (denormalized for display).
    #[serde(default)]
    pub name: String,
    /// Unit price.
    #[serde(default, with = "decimal")]
    pub price: Money,
    /// Quantity.
    #[serde(default = "default_qty", deserialize_with = "integer::qty")]
    pub qty: i64,
    /// Size label.
    #[serde(default)]
    pub size: String,
    /// Color label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Known stock cap.
    #[serde(
        default,
        deserialize_with = "integer::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<i64>,
    /// Image file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn default_qty() -> i64 {
    1
}

/// Integer fields as browsers write them: `2`, `2.0` or `"2"`.
mod integer {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::ids::VariantId;

    fn whole(f: f64) -> Option<i64> {
        (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    }

    fn parse(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole))
            }
            _ => None,
        }
    }

    pub fn variant_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<VariantId, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse(&value)
            .and_then(|id| u64::try_from(id).ok())
            .map(VariantId::new)
            .ok_or_else(|| D::Error::custom(format!("invalid variant id: {value}")))
    }

    pub fn qty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("invalid quantity: {value}")))
    }

    /// Unreadable caps are treated as unknown.
    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse))
    }
}

impl CartItem {
    /// Create a new line item.
    pub fn new(
        variant_id: VariantId,
        name: impl Into<String>,
        price: Money,
        qty: i64,
        size: impl Into<String>,
    ) -> Self {
        Self {
            variant_id,
            product_id: None,
            name: name.into(),
            price,
            qty,
            size: size.into(),
            color: None,
            max: None,
            image: None,
        }
    }

    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Effective quantity cap: the known stock, else `default_max`.
    pub fn cap(&self, default_max: i64) -> i64 {
        self.max.unwrap_or(default_max).max(1)
    }

    /// Clamp a requested quantity into `[1, cap]`.
    pub fn clamp_qty(&self, qty: i64, default_max: i64) -> i64 {
        qty.clamp(1, self.cap(default_max))
    }

    /// Bring the item back within its invariants.
    ///
    /// A non-positive `max` is treated as unknown, and `qty` is clamped into
    /// `[1, cap]`. Returns whether anything changed.
    pub fn normalize(&mut self, default_max: i64) -> bool {
        let mut changed = false;
        if matches!(self.max, Some(m) if m < 1) {
            self.max = None;
            changed = true;
        }
        let qty = self.clamp_qty(self.qty, default_max);
        if qty != self.qty {
            self.qty = qty;
            changed = true;
        }
        changed
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price * self.qty
    }

    /// Short label used in notifications, e.g. "Legging (M)".
    pub fn label(&self) -> String {
        if self.size.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn legging() -> CartItem {
        CartItem::new(
            VariantId::new(1),
            "Legging",
            Money::new(8990, Currency::BRL),
            2,
            "M",
        )
    }

    #[test]
    fn test_deserialize_storefront_record() {
        let item: CartItem = serde_json::from_str(
            r#"{"variant_id":12,"name":"Top","price":59.9,"qty":3,"size":"P","max":4,"image":"top.jpg"}"#,
        )
        .unwrap();
        assert_eq!(item.variant_id, VariantId::new(12));
        assert_eq!(item.price.amount_cents, 5990);
        assert_eq!(item.qty, 3);
        assert_eq!(item.max, Some(4));
        assert_eq!(item.image.as_deref(), Some("top.jpg"));
    }

    #[test]
    fn test_deserialize_camel_case_alias_and_defaults() {
        let item: CartItem = serde_json::from_str(r#"{"variantId":5}"#).unwrap();
        assert_eq!(item.variant_id, VariantId::new(5));
        assert_eq!(item.qty, 1);
        assert!(item.price.is_zero());
        assert_eq!(item.max, None);
    }

    #[test]
    fn test_deserialize_browser_written_numbers() {
        let item: CartItem = serde_json::from_str(
            r#"{"variant_id":"12","qty":2.0,"max":"4","price":"59.90","size":"P"}"#,
        )
        .unwrap();
        assert_eq!(item.variant_id, VariantId::new(12));
        assert_eq!(item.qty, 2);
        assert_eq!(item.max, Some(4));
        assert_eq!(item.price.amount_cents, 5990);

        let item: CartItem = serde_json::from_str(r#"{"variantId":7.0,"qty":"3","max":null}"#).unwrap();
        assert_eq!(item.variant_id, VariantId::new(7));
        assert_eq!(item.qty, 3);
        assert_eq!(item.max, None);
    }

    #[test]
    fn test_deserialize_rejects_unusable_numbers() {
        assert!(serde_json::from_str::<CartItem>(r#"{"variant_id":"abc"}"#).is_err());
        assert!(serde_json::from_str::<CartItem>(r#"{"variant_id":-3}"#).is_err());
        assert!(serde_json::from_str::<CartItem>(r#"{"variant_id":1,"qty":2.5}"#).is_err());

        let item: CartItem = serde_json::from_str(r#"{"variant_id":1,"max":"lots"}"#).unwrap();
        assert_eq!(item.max, None);
    }

    #[test]
    fn test_serialize_skips_empty_optionals() {
        let json = serde_json::to_string(&legging()).unwrap();
        assert_eq!(
            json,
            r#"{"variant_id":1,"name":"Legging","price":89.9,"qty":2,"size":"M"}"#
        );
    }

    #[test]
    fn test_normalize_clamps_to_max() {
        let mut item = legging().with_max(3);
        item.qty = 5;
        assert!(item.normalize(999));
        assert_eq!(item.qty, 3);
        assert!(!item.normalize(999));
    }

    #[test]
    fn test_normalize_drops_non_positive_max() {
        let mut item = legging().with_max(0);
        item.qty = 0;
        assert!(item.normalize(999));
        assert_eq!(item.max, None);
        assert_eq!(item.qty, 1);
    }

    #[test]
    fn test_line_total_and_label() {
        let item = legging();
        assert_eq!(item.line_total().amount_cents, 17980);
        assert_eq!(item.label(), "Legging (M)");
    }
}
