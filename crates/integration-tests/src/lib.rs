//! Integration tests for the cat food storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catfood-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_routes` - Router-level tests against an in-memory catalog
//! - `cart_persistence` - File-backed cart slot shared across store instances
//!
//! This library holds the shared fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Request, StatusCode},
};
use catfood_core::Product;
use catfood_storefront::app;
use catfood_storefront::cart::{CartRepository, MemoryCartRepository};
use catfood_storefront::catalog::{CatalogError, CatalogSource, StaticCatalog};
use catfood_storefront::state::AppState;
use tower::ServiceExt;

/// Catalog JSON in the shape the catalog API returns.
pub const CATALOG_JSON: &str = r#"[
    {"id": 1, "name": "Royal Kibble", "price": 100, "category": "dry", "age_group": "adult",
     "health": ["Urinary"], "breed_type": ["persian", "all"], "created_at": "2025-01-10T00:00:00Z"},
    {"id": 2, "name": "Tuna Pouch", "price": 50, "category": "wet", "age_group": "kitten",
     "health": null, "breed_type": ["all"], "created_at": "2025-05-01T00:00:00Z"},
    {"id": 3, "name": "Kitten Crunch", "price": 75, "category": "dry", "age_group": "kitten",
     "health": ["hairball"], "breed_type": ["british_shorthair", "persian"]},
    {"id": 4, "name": "Salmon Treats", "price": 30, "category": "snack", "age_group": "adult",
     "health": ["Weight"], "breed_type": [], "created_at": "2024-12-24 09:00:00"},
    {"id": 5, "name": "Senior Care Pate", "price": 65, "category": "wet", "age_group": "special_care",
     "breed_type": ["siamese"], "created_at": "2025-02-14"},
    {"id": 6, "name": "Hairball Formula", "price": 120, "category": "dry", "age_group": "adult",
     "health": ["HAIRBALL"], "breed_type": ["persian"], "created_at": "2025-03-03T12:00:00Z"}
]"#;

/// The fixture catalog as a source.
///
/// # Panics
///
/// Panics if [`CATALOG_JSON`] is invalid.
#[must_use]
#[allow(clippy::expect_used)]
pub fn fixture_catalog() -> Arc<dyn CatalogSource> {
    Arc::new(StaticCatalog::from_json(CATALOG_JSON).expect("fixture catalog parses"))
}

/// A catalog API that is down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCatalog;

#[async_trait]
impl CatalogSource for FailingCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Err(CatalogError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "maintenance".to_string(),
        })
    }
}

/// Router over an unreachable catalog and a fresh in-memory cart.
#[must_use]
pub fn failing_app() -> (Router, Arc<MemoryCartRepository>) {
    let repository = Arc::new(MemoryCartRepository::new());
    let state = AppState::new(Arc::new(FailingCatalog), repository.clone());
    (app(state), repository)
}

/// Router over the fixture catalog and the given cart slot.
#[must_use]
pub fn test_app(repository: Arc<dyn CartRepository>) -> Router {
    app(AppState::new(fixture_catalog(), repository))
}

/// Router over the fixture catalog and a fresh in-memory cart.
#[must_use]
pub fn memory_app() -> (Router, Arc<MemoryCartRepository>) {
    let repository = Arc::new(MemoryCartRepository::new());
    (test_app(repository.clone()), repository)
}

/// Send a request and return the status, headers and raw body.
///
/// # Panics
///
/// Panics if the router fails or the body cannot be read.
#[allow(clippy::expect_used)]
pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    (status, headers, bytes)
}

/// Send a request and return the status, headers and JSON body.
///
/// Bodies that are not JSON come back as a string value.
///
/// # Panics
///
/// Panics if the router fails.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let (status, headers, bytes) = send_raw(app, request).await;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, headers, json)
}

/// Build a GET request.
///
/// # Panics
///
/// Panics if `uri` is invalid.
#[must_use]
#[allow(clippy::expect_used)]
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("valid request")
}

/// Build a JSON `POST /cart/add` request.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn add_to_cart(product_id: i64) -> Request<Body> {
    Request::post("/cart/add")
        .header("content-type", "application/json")
        .body(Body::from(format!("{{\"product_id\": {product_id}}}")))
        .expect("valid request")
}
