//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home: badged products and breed groups
//! GET  /health                 - Health check (registered in `app`)
//!
//! # Products
//! GET  /products               - Filtered/sorted listing
//!                                ?category=dry&breed=persian&age=kitten,adult
//!                                &health=urinary&sort=price_asc
//!
//! # Cart
//! GET  /cart                   - Cart contents and totals
//! POST /cart/add               - Add one unit (sets HX-Trigger: cart-updated)
//! GET  /cart/count             - Cart count badge
//! GET  /cart/notice            - Current confirmation notice
//! GET  /cart/events            - Server-sent cart-updated events
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/count", get(cart::count))
        .route("/notice", get(cart::notice))
        .route("/events", get(cart::events))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product listing
        .route("/products", get(products::index))
        // Cart routes
        .nest("/cart", cart_routes())
}
