//! Cart domain for the storefront.
//!
//! - **Cart**: typed line items, quantity rules, persistence with observers
//! - **Stock**: batched stock lookup and reconciliation of the stored cart
//! - **Checkout**: postal code validation and shipping quotes
//! - **Catalog**: products and the size/color selection state machine
//!
//! [`CartController`] ties them together for an adapter such as the CLI.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//!
//! let api = HttpStorefrontApi::new(FetchClient::new().with_base_url("https://shop.example"));
//! let mut controller = CartController::with_api(CartStore::in_memory(), api);
//!
//! controller.add_item(CartItem::new(VariantId::new(12), "Legging", Money::from_decimal(89.9, Currency::BRL), 1, "M"));
//! let pass = controller.refresh().await;
//! println!("Total: {}", pass.view.totals.total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod stock;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::api::{HttpStorefrontApi, ShippingApi, StockApi};
    pub use crate::config::CartConfig;
    pub use crate::controller::{CartController, RenderPass};

    // Cart
    pub use crate::cart::{
        AddOutcome, Cart, CartEvent, CartItem, CartLine, CartStore, CartTotals, CartView,
        EventLevel, QuantityChange,
    };

    // Catalog
    pub use crate::catalog::{
        Availability, Dimension, Product, ProductVariant, QuantityControl, SelectionState,
        VariantSelector,
    };

    // Checkout
    pub use crate::checkout::{PostalCode, ShippingCalculator, ShippingOption, ShippingOutcome, ShippingQuote};

    // Stock
    pub use crate::stock::{reconcile, Reconciliation, StockLevels};

    pub use storefront_data::FetchClient;
}

pub use controller::CartController;
