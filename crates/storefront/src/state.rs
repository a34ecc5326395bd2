//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartRepository, CartStore, FileCartRepository};
use crate::catalog::{CatalogSource, HttpCatalog};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog source and the cart store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<dyn CatalogSource>,
    cart: CartStore,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Uses the HTTP catalog client and the file-backed cart slot under
    /// `config.cart_data_dir`.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let catalog = Arc::new(HttpCatalog::new(&config.catalog));
        let repository = Arc::new(FileCartRepository::new(&config.cart_data_dir));
        Self::new(catalog, repository)
    }

    /// Create application state from explicit collaborators.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Source of the product list
    /// * `repository` - Persistent cart slot
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogSource>, repository: Arc<dyn CartRepository>) -> Self {
        Self::with_cart(catalog, CartStore::new(repository))
    }

    /// Create application state around an existing cart store.
    #[must_use]
    pub fn with_cart(catalog: Arc<dyn CatalogSource>, cart: CartStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { catalog, cart }),
        }
    }

    /// Get a reference to the catalog source.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogSource {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
