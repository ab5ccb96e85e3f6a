//! Postal codes and shipping.

mod calculator;
mod postal_code;
mod shipping;

pub use calculator::{ShippingCalculator, ShippingOutcome, CONNECTION_ERROR_MESSAGE};
pub use postal_code::PostalCode;
pub use shipping::{ShippingOption, ShippingQuote};
