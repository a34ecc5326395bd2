//! Product catalog: fetching and the pure views derived from it.
//!
//! # Architecture
//!
//! - [`CatalogSource`] is the one async seam: it returns the full product list
//!   or a [`CatalogError`]. [`HttpCatalog`] talks to the catalog API over
//!   `reqwest` and caches the list with `moka`.
//! - [`grouper`] and [`filter`] are synchronous and total. They never see a
//!   fetch error; callers substitute an empty list via [`load_or_empty`].
//!
//! # Example
//!
//! ```rust,ignore
//! use catfood_storefront::catalog::{self, FilterState, SortOrder};
//!
//! let products = catalog::load_or_empty(&client).await;
//! let home = catalog::grouper::group_catalog(&products);
//! let listing = catalog::filter::apply(&products, &FilterState::default(), SortOrder::PriceAsc);
//! ```

mod client;
pub mod filter;
pub mod grouper;

pub use client::HttpCatalog;
pub use filter::{FilterState, SortOrder};
pub use grouper::{BadgedProduct, BreedGroups, CatalogGroups};

use async_trait::async_trait;
use catfood_core::Product;
use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog API answered with a non-success status.
    #[error("Catalog API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can produce the full product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every product, in the order the catalog defines.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Fetch the catalog, falling back to an empty list on failure.
///
/// A failed fetch is logged and never surfaced as a blocking error.
pub async fn load_or_empty(source: &dyn CatalogSource) -> Vec<Product> {
    match source.fetch_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load catalog, showing empty listing");
            Vec::new()
        }
    }
}

/// Fixed in-memory catalog.
///
/// Used by tests and by the CLI's `--catalog-file` option.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Create a catalog that always returns `products`.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a catalog from the same JSON array the catalog API returns.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid product array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}
