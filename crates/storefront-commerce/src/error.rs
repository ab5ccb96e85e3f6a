//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart, stock and shipping operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Requested more units than the variant has in stock.
    #[error("Insufficient stock for variant {variant_id}: requested {requested}, available {available}")]
    InsufficientStock {
        variant_id: String,
        requested: i64,
        available: i64,
    },

    /// Size/color selection is missing a dimension.
    #[error("Selection incomplete: choose a {0}")]
    SelectionIncomplete(&'static str),

    /// The selected size/color combination has no stock.
    #[error("Variant unavailable: {size} / {color}")]
    VariantUnavailable { size: String, color: String },

    /// Postal code is not 8 digits or is the all-zero sentinel.
    #[error("Invalid postal code: {0:?}")]
    InvalidPostalCode(String),

    /// The shipping API answered `success: false`.
    #[error("Shipping quote rejected: {}", .0.as_deref().unwrap_or("Unknown error"))]
    ShippingRejected(Option<String>),

    /// The stock API answered `success: false` or without a stock map.
    #[error("Stock check rejected")]
    StockCheckRejected,

    /// Transport or decoding failure talking to the backend.
    #[error("API error: {0}")]
    Api(#[from] storefront_data::FetchError),
}
