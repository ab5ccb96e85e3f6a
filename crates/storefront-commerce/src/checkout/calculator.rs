//! Shipping quote calculation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::ShippingApi;
use crate::checkout::{PostalCode, ShippingOption, ShippingQuote};
use crate::error::CommerceError;
use crate::money::Money;

/// Message shown when the backend could not be reached or answered garbage.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to the server. Try again.";

/// Result of a shipping calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum ShippingOutcome {
    /// The input is not a valid postal code. No request was made.
    Invalid { input: String },
    /// Delivery is available.
    Quoted {
        postal_code: PostalCode,
        quote: ShippingQuote,
        total: Money,
    },
    /// The request failed or was rejected; pickup applies.
    Failed {
        postal_code: PostalCode,
        error: String,
    },
}

impl ShippingOutcome {
    /// The shipping option to select after this outcome.
    ///
    /// `None` for invalid input, which leaves the current selection alone.
    pub fn selection(&self) -> Option<ShippingOption> {
        match self {
            ShippingOutcome::Invalid { .. } => None,
            ShippingOutcome::Quoted { quote, .. } => Some(ShippingOption::Delivery(quote.clone())),
            ShippingOutcome::Failed { .. } => Some(ShippingOption::Pickup),
        }
    }

    /// Inline error text, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            ShippingOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Quotes delivery for a postal code against a cart subtotal.
#[derive(Clone)]
pub struct ShippingCalculator {
    api: Arc<dyn ShippingApi>,
}

impl ShippingCalculator {
    pub fn new(api: Arc<dyn ShippingApi>) -> Self {
        Self { api }
    }

    /// Quote an already validated postal code. Issues exactly one request.
    pub async fn quote(&self, postal_code: &PostalCode, subtotal: Money) -> ShippingOutcome {
        match self.api.calculate_shipping(postal_code).await {
            Ok(quote) => {
                debug!(cep = %postal_code, cost = %quote.cost, "shipping quoted");
                ShippingOutcome::Quoted {
                    postal_code: postal_code.clone(),
                    total: subtotal + quote.cost,
                    quote,
                }
            }
            Err(CommerceError::ShippingRejected(message)) => {
                let message = message.unwrap_or_else(|| "Unknown error".to_string());
                warn!(cep = %postal_code, message = %message, "shipping quote rejected");
                ShippingOutcome::Failed {
                    postal_code: postal_code.clone(),
                    error: format!("Error: {}", message),
                }
            }
            Err(e) => {
                warn!(cep = %postal_code, error = %e, "shipping request failed");
                ShippingOutcome::Failed {
                    postal_code: postal_code.clone(),
                    error: CONNECTION_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }
}
