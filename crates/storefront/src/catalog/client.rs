//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP and caches the product list using `moka`
//! (TTL from configuration, 5 minutes by default).

use std::sync::Arc;

use async_trait::async_trait;
use catfood_core::Product;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::{CatalogError, CatalogSource};
use crate::config::CatalogConfig;

const PRODUCTS_PATH: &str = "api/products";
const PRODUCTS_CACHE_KEY: &str = "products";

/// Client for the catalog API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<SecretString>,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl HttpCatalog {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        let endpoint = config.api_url.join(PRODUCTS_PATH).map_or_else(
            |_| format!("{}/{PRODUCTS_PATH}", config.api_url.as_str().trim_end_matches('/')),
            String::from,
        );

        Self {
            inner: Arc::new(HttpCatalogInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.api_token.clone(),
                cache,
            }),
        }
    }

    /// The fully resolved products endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    async fn request_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut request = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .header("Accept", "application/json");

        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let products = self.request_products().await?;
        debug!(count = products.len(), "Fetched catalog");

        self.inner
            .cache
            .insert(PRODUCTS_CACHE_KEY, Arc::new(products.clone()))
            .await;

        Ok(products)
    }
}
