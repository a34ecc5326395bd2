//! File-backed cart slot tests.
//!
//! These verify that the cart survives across store instances (a restart)
//! and that corrupt or missing blobs degrade to an empty cart.

use std::sync::Arc;

use axum::http::StatusCode;
use catfood_integration_tests::{add_to_cart, get, send, test_app};
use catfood_storefront::cart::{CartRepository, CartStore, FileCartRepository};
use catfood_storefront::catalog::{self, CatalogSource, StaticCatalog};

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    let first = test_app(Arc::new(FileCartRepository::new(dir.path())));
    send(&first, add_to_cart(6)).await;
    send(&first, add_to_cart(6)).await;
    drop(first);

    let second = test_app(Arc::new(FileCartRepository::new(dir.path())));
    let (status, _, body) = send(&second, get("/cart")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 2);
    assert_eq!(body["entries"][0]["name"], "Hairball Formula");
}

#[tokio::test]
async fn test_corrupt_cart_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = FileCartRepository::new(dir.path());
    tokio::fs::write(repo.path(), b"{\"not\": \"a cart\"")
        .await
        .expect("write corrupt blob");

    let app = test_app(Arc::new(repo.clone()));
    let (_, _, body) = send(&app, get("/cart/count")).await;
    assert_eq!(body["count"], 0);

    let (_, _, body) = send(&app, add_to_cart(1)).await;
    assert_eq!(body["persisted"], true);
    assert_eq!(repo.load().await.expect("valid after rewrite").item_count(), 1);
}

#[tokio::test]
async fn test_change_notification_reaches_subscribers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CartStore::new(Arc::new(FileCartRepository::new(dir.path())));
    let mut badge = store.subscribe();

    let source: Arc<dyn CatalogSource> = Arc::new(
        StaticCatalog::from_json(catfood_integration_tests::CATALOG_JSON).expect("catalog"),
    );
    let products = catalog::load_or_empty(source.as_ref()).await;
    let update = store.add_to_cart(&products[0]).await;

    assert!(update.persisted);

    assert!(badge.try_recv().is_ok());
}
