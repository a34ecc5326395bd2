//! Cart route handlers.
//!
//! The cart is a single process-wide slot. Successful adds answer with an
//! `HX-Trigger: cart-updated` header and are also broadcast to every
//! `/cart/events` subscriber so badges elsewhere can refresh.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json,
    extract::State,
    response::{
        AppendHeaders, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use catfood_core::{Price, ProductId};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::instrument;

use crate::cart::{CartEntry, Notice};
use crate::error::{self, AppError, Result};
use crate::state::AppState;

/// Event name used for the response header and the SSE stream.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub entries: Vec<CartEntryView>,
    pub item_count: u32,
    pub subtotal: Price,
}

/// One cart line with its computed total.
#[derive(Debug, Serialize)]
pub struct CartEntryView {
    #[serde(flatten)]
    pub entry: CartEntry,
    pub line_total: Price,
}

impl From<&crate::cart::Cart> for CartView {
    fn from(cart: &crate::cart::Cart) -> Self {
        Self {
            entries: cart
                .entries()
                .iter()
                .map(|entry| CartEntryView {
                    entry: entry.clone(),
                    line_total: entry.line_total(),
                })
                .collect(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Add to cart response body.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub quantity: u32,
    pub item_count: u32,
    /// `false` when the cart could not be saved and the change will not
    /// survive a restart.
    pub persisted: bool,
    pub notice: Notice,
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().cart().await;
    Json(CartView::from(&cart))
}

/// Add one unit of a catalog product to the cart.
///
/// The product is looked up in the current catalog, so an unreachable
/// catalog is reported as a gateway error rather than an unknown product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Response> {
    let products = state.catalog().fetch_products().await?;
    let product = products
        .into_iter()
        .find(|p| p.id == request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let product_id = product.id.to_string();
    error::add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    let update = state.cart().add_to_cart(&product).await;
    let body = Json(AddToCartResponse {
        quantity: update.quantity,
        item_count: update.cart.item_count(),
        persisted: update.persisted,
        notice: update.notice,
    });

    if update.persisted {
        Ok((AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), body).into_response())
    } else {
        Ok(body.into_response())
    }
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let count = state.cart().cart().await.item_count();
    Json(CartCount { count })
}

/// Get the confirmation notice currently showing, if any.
pub async fn notice(State(state): State<AppState>) -> Json<Option<Notice>> {
    Json(state.cart().current_notice())
}

/// Stream cart change notifications as server-sent events.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let mut changes = state.cart().subscribe();

    let stream = async_stream::stream! {
        loop {
            match changes.recv().await {
                Ok(_) => yield Ok(Event::default().event(CART_UPDATED_EVENT).data("")),
                // Missed some; one refresh covers them all
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Cart event subscriber lagged");
                    yield Ok(Event::default().event(CART_UPDATED_EVENT).data(""));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
