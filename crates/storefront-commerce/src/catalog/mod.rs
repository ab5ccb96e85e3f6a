//! Products and variant selection.

mod product;
mod variant;

pub use product::{Product, ProductVariant};
pub use variant::{Availability, Dimension, QuantityControl, SelectionState, VariantSelector};
