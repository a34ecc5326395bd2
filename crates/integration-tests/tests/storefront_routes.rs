//! Router-level tests for the storefront endpoints.
//!
//! These run the full axum router against the fixture catalog and an
//! in-memory cart slot.

use std::time::Duration;

use axum::http::StatusCode;
use catfood_integration_tests::{add_to_cart, failing_app, get, memory_app, send, send_raw};
use futures::StreamExt;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tower::ServiceExt;

fn ids(products: &Value) -> Vec<i64> {
    products
        .as_array()
        .map(|items| items.iter().filter_map(|p| p["id"].as_i64()).collect())
        .unwrap_or_default()
}

// =============================================================================
// Health & Home
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _) = memory_app();
    let (status, headers, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
    assert!(headers.contains_key("x-request-id"));
}

/// Home payload with breed groups kept in wire order.
#[derive(Debug, Deserialize)]
struct HomeGroups {
    breed_groups: IndexMap<String, Vec<Value>>,
}

#[tokio::test]
async fn test_home_breed_groups_keep_first_seen_order() {
    let (app, _) = memory_app();
    let (_, _, bytes) = send_raw(&app, get("/")).await;
    let home: HomeGroups = serde_json::from_slice(&bytes).expect("home payload");

    let keys: Vec<&str> = home.breed_groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["persian", "british_shorthair", "siamese"]);
}

#[tokio::test]
async fn test_home_badges_and_groups() {
    let (app, _) = memory_app();
    let (status, _, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    let badges: Vec<Value> = body["products"]
        .as_array()
        .map(|items| items.iter().map(|p| p["badge"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(badges.len(), 6);
    assert!(badges[..5].iter().all(|b| b == "new"));
    assert!(badges[5].is_null());

    let groups = body["breed_groups"].as_object().expect("groups object");
    assert_eq!(groups.len(), 3);
    assert_eq!(ids(&body["breed_groups"]["persian"]), vec![1, 3, 6]);
    assert!(!groups.contains_key("all"));
    assert!(body["empty_state"].is_null());
}

#[tokio::test]
async fn test_home_with_request_id_passthrough() {
    let (app, _) = memory_app();
    let request = axum::http::Request::get("/")
        .header("x-request-id", "edge-1234")
        .body(axum::body::Body::empty())
        .expect("valid request");
    let (_, headers, _) = send(&app, request).await;
    assert_eq!(headers["x-request-id"], "edge-1234");
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_unfiltered_keeps_catalog_order() {
    let (app, _) = memory_app();
    let (status, _, body) = send(&app, get("/products")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["heading"], "All products");
    assert_eq!(body["count"], 6);
    assert_eq!(ids(&body["products"]), vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_listing_category_deep_link() {
    let (app, _) = memory_app();
    let (_, _, body) = send(&app, get("/products?category=dry")).await;

    assert_eq!(body["heading"], "Dry cat food");
    assert_eq!(body["category"], "dry");
    assert_eq!(ids(&body["products"]), vec![1, 3, 6]);
}

#[tokio::test]
async fn test_listing_breed_deep_link_with_sort() {
    let (app, _) = memory_app();
    let (_, _, body) = send(&app, get("/products?breed=persian&sort=price_desc")).await;
    assert_eq!(ids(&body["products"]), vec![6, 1, 3]);
}

#[tokio::test]
async fn test_listing_combined_filters() {
    let (app, _) = memory_app();
    let (_, _, body) = send(
        &app,
        get("/products?category=dry&age=kitten,adult&health=hairball"),
    )
    .await;
    assert_eq!(ids(&body["products"]), vec![3, 6]);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_listing_newest_first() {
    let (app, _) = memory_app();
    let (_, _, body) = send(&app, get("/products?sort=newest")).await;
    // Product 3 has no timestamp and sorts last
    assert_eq!(ids(&body["products"]), vec![2, 6, 5, 1, 4, 3]);
}

#[tokio::test]
async fn test_listing_price_asc() {
    let (app, _) = memory_app();
    let (_, _, body) = send(&app, get("/products?sort=price_asc")).await;
    assert_eq!(ids(&body["products"]), vec![4, 2, 5, 3, 1, 6]);
}

#[tokio::test]
async fn test_listing_rejects_unknown_sort() {
    let (app, _) = memory_app();
    let (status, _, _) = send(&app, get("/products?sort=popular")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, get("/products?category=raw")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_twice() {
    let (app, repo) = memory_app();

    let (status, headers, body) = send(&app, add_to_cart(3)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["hx-trigger"], "cart-updated");
    assert_eq!(body["quantity"], 1);
    assert_eq!(body["persisted"], true);
    assert_eq!(body["notice"]["message"], "Kitten Crunch added to cart");

    let (_, _, body) = send(&app, add_to_cart(3)).await;
    assert_eq!(body["quantity"], 2);
    assert_eq!(body["item_count"], 2);

    let raw = repo.raw().await.expect("cart persisted");
    let blob: Value = serde_json::from_str(&raw).expect("blob is JSON");
    assert_eq!(blob.as_array().map(Vec::len), Some(1));
    assert_eq!(blob[0]["id"], 3);
    assert_eq!(blob[0]["name"], "Kitten Crunch");
    assert_eq!(blob[0]["quantity"], 2);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let (app, repo) = memory_app();
    let (status, _, body) = send(&app, add_to_cart(99)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::String("Not found: product 99".to_string()));
    assert!(repo.raw().await.is_none());
}

#[tokio::test]
async fn test_cart_view_and_count() {
    let (app, _) = memory_app();
    send(&app, add_to_cart(1)).await;
    send(&app, add_to_cart(4)).await;
    send(&app, add_to_cart(4)).await;

    let (status, _, body) = send(&app, get("/cart")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["entries"]), vec![1, 4]);
    assert_eq!(body["entries"][1]["quantity"], 2);
    assert_eq!(body["entries"][1]["line_total"], 60.0);
    assert_eq!(body["item_count"], 3);
    assert_eq!(body["subtotal"], 160.0);

    let (_, _, body) = send(&app, get("/cart/count")).await;
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn test_failed_write_is_not_fatal() {
    let (app, repo) = memory_app();
    repo.set_fail_writes(true);

    let (status, headers, body) = send(&app, add_to_cart(2)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!headers.contains_key("hx-trigger"));
    assert_eq!(body["persisted"], false);
    assert_eq!(body["quantity"], 1);

    let (_, _, body) = send(&app, get("/cart/count")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_notice_endpoint() {
    let (app, _) = memory_app();
    let (_, _, body) = send(&app, get("/cart/notice")).await;
    assert!(body.is_null());

    send(&app, add_to_cart(5)).await;
    let (_, _, body) = send(&app, get("/cart/notice")).await;
    assert_eq!(body["message"], "Senior Care Pate added to cart");
}

// =============================================================================
// Change events
// =============================================================================

#[tokio::test]
async fn test_cart_events_stream_announces_adds() {
    let (app, _) = memory_app();
    let response = app
        .clone()
        .oneshot(get("/cart/events"))
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    let mut frames = response.into_body().into_data_stream();

    let (status, _, _) = send(&app, add_to_cart(1)).await;
    assert_eq!(status, StatusCode::OK);

    let frame = tokio::time::timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("event arrives")
        .expect("stream open")
        .expect("frame reads");
    let text = String::from_utf8_lossy(&frame);
    assert!(text.contains("event: cart-updated"), "unexpected frame: {text}");
}

// =============================================================================
// Catalog outage
// =============================================================================

#[tokio::test]
async fn test_home_degrades_to_empty_state() {
    let (app, _) = failing_app();
    let (status, _, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["empty_state"], "No breed groups yet");
    assert_eq!(body["products"], Value::Array(Vec::new()));
    assert_eq!(body["breed_groups"].as_object().map(serde_json::Map::len), Some(0));
}

#[tokio::test]
async fn test_listing_degrades_to_empty() {
    let (app, _) = failing_app();
    let (status, _, body) = send(&app, get("/products?category=dry&sort=newest")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["heading"], "Dry cat food");
}

#[tokio::test]
async fn test_add_during_outage_is_bad_gateway() {
    let (app, repo) = failing_app();
    let (status, headers, body) = send(&app, add_to_cart(1)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!headers.contains_key("hx-trigger"));
    assert_eq!(body, Value::String("External service error".to_string()));
    assert!(repo.raw().await.is_none());

    let (_, _, body) = send(&app, get("/cart/count")).await;
    assert_eq!(body["count"], 0);
}
