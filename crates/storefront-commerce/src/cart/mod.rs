//! Shopping cart.
//!
//! [`Cart`] holds the lines and the quantity rules, [`CartStore`] persists it
//! through a key-value cache, and [`CartView`] is what adapters render.

#[allow(clippy::module_inception)]
mod cart;
mod events;
mod item;
mod pricing;
mod store;

pub use cart::{AddOutcome, Cart, QuantityChange};
pub use events::{CartEvent, EventLevel};
pub use item::CartItem;
pub use pricing::{CartLine, CartTotals, CartView};
pub use store::CartStore;
