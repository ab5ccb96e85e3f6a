//! Remote stock levels and cart reconciliation.

mod reconcile;

pub use reconcile::{reconcile, Reconciliation, StockAdjustment};

use std::collections::HashMap;

use tracing::debug;

use crate::ids::VariantId;

/// Remaining stock per variant, as reported by the backend.
///
/// A variant missing from the map has unknown stock, which reconciliation
/// treats the same as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLevels {
    levels: HashMap<VariantId, i64>,
}

impl StockLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the wire map, whose keys are stringified variant ids.
    ///
    /// Keys that are not ids and values that are not numbers are skipped.
    pub fn from_wire(stock: HashMap<String, serde_json::Value>) -> Self {
        let mut levels = HashMap::with_capacity(stock.len());
        for (key, value) in stock {
            let Ok(id) = key.parse::<VariantId>() else {
                debug!(key = %key, "ignoring stock entry with non-numeric id");
                continue;
            };
            let qty = match &value {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f.floor() as i64)),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            match qty {
                Some(qty) => {
                    levels.insert(id, qty);
                }
                None => debug!(variant_id = %id, "ignoring non-numeric stock value"),
            }
        }
        Self { levels }
    }

    pub fn insert(&mut self, variant_id: VariantId, qty: i64) {
        self.levels.insert(variant_id, qty);
    }

    /// Remaining stock, or `None` when unknown.
    pub fn get(&self, variant_id: VariantId) -> Option<i64> {
        self.levels.get(&variant_id).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(VariantId, i64)> for StockLevels {
    fn from_iter<I: IntoIterator<Item = (VariantId, i64)>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}
