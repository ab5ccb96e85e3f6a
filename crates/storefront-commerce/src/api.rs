//! Storefront backend endpoints.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storefront_data::{FetchClient, FetchError, Response};
use tracing::{debug, warn};

use crate::checkout::{PostalCode, ShippingQuote};
use crate::error::CommerceError;
use crate::ids::VariantId;
use crate::money::{decimal, Money};
use crate::stock::StockLevels;

/// Path of the shipping quote endpoint.
pub const SHIPPING_PATH: &str = "/api/calculate-shipping";

/// Path of the batched stock endpoint.
pub const STOCK_PATH: &str = "/api/check-stock";

/// Batched stock lookup.
#[async_trait]
pub trait StockApi: Send + Sync {
    /// Fetch remaining stock for every id in one request.
    async fn check_stock(&self, variant_ids: &[VariantId]) -> Result<StockLevels, CommerceError>;
}

/// Delivery quote by postal code.
#[async_trait]
pub trait ShippingApi: Send + Sync {
    async fn calculate_shipping(
        &self,
        postal_code: &PostalCode,
    ) -> Result<ShippingQuote, CommerceError>;
}

#[derive(Debug, Serialize)]
struct ShippingRequest<'a> {
    cep: &'a str,
    method: &'static str,
}

#[derive(Debug, Deserialize)]
struct ShippingResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, with = "decimal")]
    shipping_cost: Money,
    #[serde(default)]
    distance_km: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct StockRequest<'a> {
    variant_ids: &'a [VariantId],
}

#[derive(Debug, Deserialize)]
struct StockResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    stock: Option<HashMap<String, serde_json::Value>>,
}

/// HTTP implementation of the storefront endpoints.
#[derive(Clone)]
pub struct HttpStorefrontApi {
    client: FetchClient,
}

impl HttpStorefrontApi {
    /// Wrap a fetch client. Paths are resolved against its base URL.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

/// Decode a JSON body whatever the status; the backend reports failures
/// as `{"success": false, ...}` with an error status.
fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    match response.json::<T>() {
        Ok(body) => Ok(body),
        Err(_) if !response.is_success() => Err(FetchError::HttpError {
            status: response.status,
            message: response.text().unwrap_or_default(),
        }),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl StockApi for HttpStorefrontApi {
    async fn check_stock(&self, variant_ids: &[VariantId]) -> Result<StockLevels, CommerceError> {
        let response = self
            .client
            .post(STOCK_PATH)
            .json(&StockRequest { variant_ids })?
            .send()
            .await?;
        let body: StockResponse = decode(response)?;

        match body.stock {
            Some(stock) if body.success => {
                debug!(requested = variant_ids.len(), returned = stock.len(), "stock checked");
                Ok(StockLevels::from_wire(stock))
            }
            _ => {
                warn!("stock check answered without stock levels");
                Err(CommerceError::StockCheckRejected)
            }
        }
    }
}

#[async_trait]
impl ShippingApi for HttpStorefrontApi {
    async fn calculate_shipping(
        &self,
        postal_code: &PostalCode,
    ) -> Result<ShippingQuote, CommerceError> {
        let response = self
            .client
            .post(SHIPPING_PATH)
            .json(&ShippingRequest {
                cep: postal_code.as_str(),
                method: "delivery",
            })?
            .send()
            .await?;
        let body: ShippingResponse = decode(response)?;

        if !body.success {
            return Err(CommerceError::ShippingRejected(body.message));
        }
        Ok(ShippingQuote {
            cost: body.shipping_cost,
            distance_km: body.distance_km.unwrap_or(0.0),
            message: body.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap as Map;
    use std::sync::Arc;
    use storefront_data::mock::MockTransport;

    fn api(transport: &Arc<MockTransport>) -> HttpStorefrontApi {
        HttpStorefrontApi::new(
            FetchClient::with_transport(transport.clone()).with_base_url("http://shop.test"),
        )
    }

    fn cep() -> PostalCode {
        PostalCode::parse("12345678").unwrap()
    }

    #[tokio::test]
    async fn test_shipping_request_shape() {
        let transport = Arc::new(MockTransport::new());
        transport.reply_json(
            SHIPPING_PATH,
            json!({"success": true, "shipping_cost": 15.5, "distance_km": 8.2}),
        );

        let quote = api(&transport).calculate_shipping(&cep()).await.unwrap();
        assert_eq!(quote.cost.amount_cents, 1550);
        assert_eq!(quote.distance_km, 8.2);

        let sent = transport.requests_to(SHIPPING_PATH);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://shop.test/api/calculate-shipping");
        assert_eq!(
            sent[0].json_body(),
            Some(json!({"cep": "12345678", "method": "delivery"}))
        );
    }

    #[tokio::test]
    async fn test_shipping_rejection_carries_message() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(
            SHIPPING_PATH,
            Response::new(
                400,
                Map::new(),
                br#"{"success": false, "message": "Out of delivery area"}"#.to_vec(),
            ),
        );

        let err = api(&transport).calculate_shipping(&cep()).await.unwrap_err();
        assert!(matches!(
            err,
            CommerceError::ShippingRejected(Some(ref m)) if m == "Out of delivery area"
        ));
    }

    #[tokio::test]
    async fn test_non_json_error_status() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(
            SHIPPING_PATH,
            Response::new(502, Map::new(), b"Bad Gateway".to_vec()),
        );

        let err = api(&transport).calculate_shipping(&cep()).await.unwrap_err();
        assert!(matches!(
            err,
            CommerceError::Api(FetchError::HttpError { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_check_stock_batches_ids() {
        let transport = Arc::new(MockTransport::new());
        transport.reply_json(STOCK_PATH, json!({"success": true, "stock": {"1": 2, "7": 0}}));

        let ids = [VariantId::new(1), VariantId::new(7)];
        let levels = api(&transport).check_stock(&ids).await.unwrap();
        assert_eq!(levels.get(VariantId::new(1)), Some(2));
        assert_eq!(levels.get(VariantId::new(7)), Some(0));

        let sent = transport.requests_to(STOCK_PATH);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].json_body(), Some(json!({"variant_ids": [1, 7]})));
    }

    #[tokio::test]
    async fn test_check_stock_rejected() {
        let transport = Arc::new(MockTransport::new());
        transport.reply_json(STOCK_PATH, json!({"success": false}));

        let err = api(&transport)
            .check_stock(&[VariantId::new(1)])
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::StockCheckRejected));
    }
}
