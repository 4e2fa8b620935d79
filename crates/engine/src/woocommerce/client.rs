//! WooCommerce REST API client.
//!
//! Authenticates with the consumer key/secret over HTTP basic auth and
//! exposes the handful of endpoints the sync adapter needs behind the
//! [`WooApi`] trait, so tests (and alternative backends) can substitute
//! an implementation.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::WooCommerceConfig;

use super::types::{
    ProductCreate, ProductUpdate, RemoteCategory, RemoteProduct, Webhook,
};

/// WooCommerce REST API version prefix.
const API_PREFIX: &str = "/wp-json/wc/v3";

/// Errors that can occur when talking to the WooCommerce API.
#[derive(Debug, Error)]
pub enum WooError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The store is unreachable or rejected the credentials. Raised by
    /// the pre-flight probe; short-circuits whole batches.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// The WooCommerce operations the sync adapter depends on.
#[async_trait]
pub trait WooApi: Send + Sync {
    /// Lightweight connectivity and credential check.
    async fn probe(&self) -> Result<(), WooError>;

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>, WooError>;
    async fn create_category(&self, name: &str) -> Result<RemoteCategory, WooError>;

    /// Look up a product by its exact SKU.
    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<RemoteProduct>, WooError>;
    async fn create_product(&self, payload: &ProductCreate) -> Result<RemoteProduct, WooError>;
    async fn update_product(
        &self,
        id: i64,
        payload: &ProductUpdate,
    ) -> Result<RemoteProduct, WooError>;
    /// One page of the remote catalog; an empty page ends pagination.
    async fn list_products(&self, page: u32) -> Result<Vec<RemoteProduct>, WooError>;

    async fn list_webhooks(&self) -> Result<Vec<Webhook>, WooError>;
    async fn create_webhook(&self, topic: &str, delivery_url: &str) -> Result<Webhook, WooError>;
    async fn update_webhook(&self, id: i64, delivery_url: &str) -> Result<Webhook, WooError>;
}

/// HTTP implementation of [`WooApi`].
#[derive(Clone)]
pub struct WooClient {
    client: reqwest::Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: SecretString,
}

impl WooClient {
    /// Create a client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &WooCommerceConfig) -> Result<Self, WooError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}{API_PREFIX}", config.base_url),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .basic_auth(
                &self.consumer_key,
                Some(self.consumer_secret.expose_secret()),
            )
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, WooError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WooError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| WooError::Parse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, WooError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, WooError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, WooError> {
        let response = self
            .request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl WooApi for WooClient {
    async fn probe(&self) -> Result<(), WooError> {
        let response = self
            .request(reqwest::Method::GET, "/products?per_page=1")
            .send()
            .await
            .map_err(|e| WooError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(WooError::ConnectionFailed(format!(
                "credentials rejected ({status})"
            )));
        }
        if !status.is_success() {
            return Err(WooError::ConnectionFailed(format!(
                "store answered {status}"
            )));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>, WooError> {
        self.get("/products/categories?per_page=100").await
    }

    async fn create_category(&self, name: &str) -> Result<RemoteCategory, WooError> {
        self.post(
            "/products/categories",
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<RemoteProduct>, WooError> {
        let path = format!("/products?sku={}", urlencoding::encode(sku));
        let mut matches: Vec<RemoteProduct> = self.get(&path).await?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }

    async fn create_product(&self, payload: &ProductCreate) -> Result<RemoteProduct, WooError> {
        self.post("/products", payload).await
    }

    async fn update_product(
        &self,
        id: i64,
        payload: &ProductUpdate,
    ) -> Result<RemoteProduct, WooError> {
        self.put(&format!("/products/{id}"), payload).await
    }

    async fn list_products(&self, page: u32) -> Result<Vec<RemoteProduct>, WooError> {
        self.get(&format!("/products?per_page=100&page={page}"))
            .await
    }

    async fn list_webhooks(&self) -> Result<Vec<Webhook>, WooError> {
        self.get("/webhooks?per_page=100").await
    }

    async fn create_webhook(&self, topic: &str, delivery_url: &str) -> Result<Webhook, WooError> {
        self.post(
            "/webhooks",
            &serde_json::json!({ "topic": topic, "delivery_url": delivery_url }),
        )
        .await
    }

    async fn update_webhook(&self, id: i64, delivery_url: &str) -> Result<Webhook, WooError> {
        self.put(
            &format!("/webhooks/{id}"),
            &serde_json::json!({ "delivery_url": delivery_url }),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_api_prefix() {
        let config = WooCommerceConfig {
            base_url: "https://loja.example.com".to_string(),
            consumer_key: "ck_test".to_string(),
            consumer_secret: SecretString::from("cs_test"),
            webhook_delivery_url: None,
        };
        let client = WooClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://loja.example.com/wp-json/wc/v3");
    }
}
