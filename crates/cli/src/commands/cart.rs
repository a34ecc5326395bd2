//! Cart management commands.
//!
//! Operates on the same file-backed slot the storefront service uses, so
//! `CART_DATA_DIR` must match the service's setting.

use std::path::Path;
use std::sync::Arc;

use catfood_core::ProductId;
use catfood_storefront::cart::{CartStore, FileCartRepository};
use catfood_storefront::catalog::CatalogSource;
use serde_json::json;
use tracing::{info, warn};

use super::{CliError, print_json};

fn open_store(data_dir: &Path) -> CartStore {
    CartStore::new(Arc::new(FileCartRepository::new(data_dir)))
}

/// Print the cart with totals.
///
/// # Errors
///
/// Returns an error if output encoding fails.
pub async fn show(data_dir: &Path) -> Result<(), CliError> {
    let cart = open_store(data_dir).cart().await;
    print_json(&json!({
        "entries": cart.entries(),
        "item_count": cart.item_count(),
        "subtotal": cart.subtotal(),
    }))
}

/// Add one unit of `product_id` to the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or does not contain
/// the product.
pub async fn add(
    source: &dyn CatalogSource,
    data_dir: &Path,
    product_id: ProductId,
) -> Result<(), CliError> {
    let product = source
        .fetch_products()
        .await?
        .into_iter()
        .find(|p| p.id == product_id)
        .ok_or(CliError::UnknownProduct(product_id))?;

    let store = open_store(data_dir);
    let update = store.add_to_cart(&product).await;

    if update.persisted {
        info!(product = %product.name, quantity = update.quantity, "Added to cart");
    } else {
        warn!(product = %product.name, "Cart could not be saved; change is not persisted");
    }

    print_json(&json!({
        "product_id": product_id,
        "quantity": update.quantity,
        "item_count": update.cart.item_count(),
        "persisted": update.persisted,
    }))
}
