//! HTTP client utilities for the storefront backend API.
//!
//! Provides a small builder API for JSON requests over a pluggable
//! [`Transport`]. Production code uses [`ReqwestTransport`]; tests script
//! replies with `MockTransport` (feature `mock`).
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_data::FetchClient;
//!
//! let client = FetchClient::new().with_base_url("https://loja.example.com");
//!
//! let quote: QuoteResponse = client
//!     .post("/api/calculate-shipping")
//!     .json(&QuoteRequest { cep: "01310100".into(), method: "delivery".into() })?
//!     .send()
//!     .await?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

pub use error::FetchError;
pub use request::{Method, Request};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

/// HTTP client for making outbound requests.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client over `reqwest`.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            transport,
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) => {
                if url.starts_with("http://") || url.starts_with("https://") {
                    url
                } else {
                    format!("{}{}", base.trim_end_matches('/'), url)
                }
            }
            None => url,
        };

        let mut request = Request::new(method, full_url);
        for (key, value) in &self.default_headers {
            request = request.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            request,
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    request: Request,
    transport: Arc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.request = self.request.json(value)?;
        Ok(self)
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        debug!(method = self.request.method.as_str(), url = %self.request.url, "sending request");
        self.transport.send(self.request).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Request, Response, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[tokio::test]
    async fn test_base_url_is_prepended() {
        let transport = Arc::new(MockTransport::new());
        transport.reply_json("/api/check-stock", serde_json::json!({ "success": true }));

        let client = FetchClient::with_transport(transport.clone())
            .with_base_url("http://localhost:5000/");
        let resp = client.post("/api/check-stock").send().await.unwrap();

        assert!(resp.is_success());
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://localhost:5000/api/check-stock");
        assert_eq!(sent[0].method, Method::Post);
    }

    #[tokio::test]
    async fn test_absolute_url_ignores_base() {
        let transport = Arc::new(MockTransport::new());
        transport.reply_json("/status", serde_json::json!({}));

        let client = FetchClient::with_transport(transport.clone())
            .with_base_url("http://localhost:5000");
        client.get("https://other.example/status").send().await.unwrap();

        assert_eq!(transport.requests()[0].url, "https://other.example/status");
    }

    #[tokio::test]
    async fn test_default_headers_are_sent() {
        let transport = Arc::new(MockTransport::new());
        transport.reply_json("/x", serde_json::json!({}));

        let client = FetchClient::with_transport(transport.clone())
            .with_default_header("Accept", "application/json");
        client.get("/x").send().await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[tokio::test]
    async fn test_unscripted_path_is_connection_error() {
        let transport = Arc::new(MockTransport::new());
        let client = FetchClient::with_transport(transport);
        let result = client.get("/nowhere").send().await;
        assert!(matches!(result, Err(FetchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_scripted_replies_consumed_in_order() {
        let transport = Arc::new(MockTransport::new());
        transport
            .fail("/api/calculate-shipping", "offline")
            .reply_json("/api/calculate-shipping", serde_json::json!({ "success": true }));

        let client = FetchClient::with_transport(transport.clone());
        assert!(client.post("/api/calculate-shipping").send().await.is_err());
        assert!(client.post("/api/calculate-shipping").send().await.is_ok());
        assert!(client.post("/api/calculate-shipping").send().await.is_ok());
        assert_eq!(transport.requests_to("/api/calculate-shipping").len(), 3);
    }
}
