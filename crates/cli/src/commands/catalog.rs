//! Catalog query commands.

use catfood_core::Product;
use catfood_storefront::catalog::{self, CatalogSource, filter, grouper};
use serde::Serialize;
use tracing::info;

use super::{CatalogArgs, CliError, print_json};

/// One breed group, summarized for the terminal.
#[derive(Debug, Serialize)]
struct GroupSummary<'a> {
    breed: &'a str,
    count: usize,
    products: Vec<&'a str>,
}

/// Print the filtered, sorted listing.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the catalog fetch fails.
pub async fn products(source: &dyn CatalogSource, args: &CatalogArgs) -> Result<(), CliError> {
    let (filters, sort) = args.to_filters()?;

    // Unlike the web views, a failed fetch is an error here
    let products: Vec<Product> = source.fetch_products().await?;
    let listed = filter::apply(&products, &filters, sort);

    info!(total = products.len(), shown = listed.len(), "Filtered catalog");
    print_json(&listed)
}

/// Print new arrivals and breed groups.
///
/// # Errors
///
/// Returns an error if output encoding fails.
pub async fn groups(source: &dyn CatalogSource) -> Result<(), CliError> {
    let products = catalog::load_or_empty(source).await;
    let groups = grouper::group_catalog(&products);

    if groups.is_empty() {
        info!("No breed groups yet");
    }

    let summary: Vec<GroupSummary<'_>> = groups
        .breed_groups
        .iter()
        .map(|(breed, items)| GroupSummary {
            breed,
            count: items.len(),
            products: items.iter().map(|i| i.product.name.as_str()).collect(),
        })
        .collect();

    let new_arrivals: Vec<&str> = groups
        .products
        .iter()
        .filter(|p| p.badge.is_some())
        .map(|p| p.product.name.as_str())
        .collect();

    print_json(&serde_json::json!({
        "new_arrivals": new_arrivals,
        "breed_groups": summary,
    }))
}
