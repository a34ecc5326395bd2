//! Product listing route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use catfood_core::{AgeGroup, Category, Product};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{self, FilterState, SortOrder, filter};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters.
///
/// `category` and `breed` double as deep-link parameters. Multi-valued
/// dimensions take comma-separated values (`age=kitten,adult`).
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub age: Option<String>,
    pub health: Option<String>,
    pub breed: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    /// Build the filter state these parameters select.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for unknown category or age codes.
    pub fn filter_state(&self) -> Result<FilterState> {
        let mut state = FilterState::new();

        if let Some(code) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            let category = Category::from_code(code)
                .ok_or_else(|| AppError::BadRequest(format!("unknown category: {code}")))?;
            state.set_category(Some(category));
        }

        for code in split_values(self.age.as_deref()) {
            let age = AgeGroup::from_code(code)
                .ok_or_else(|| AppError::BadRequest(format!("unknown age group: {code}")))?;
            if !state.ages().contains(&age) {
                state.toggle_age(age);
            }
        }

        for tag in split_values(self.health.as_deref()) {
            if !state.health_tags().contains(&tag.to_lowercase()) {
                state.toggle_health(tag);
            }
        }

        for tag in split_values(self.breed.as_deref()) {
            if !state.breed_tags().contains(tag) {
                state.toggle_breed(tag);
            }
        }

        Ok(state)
    }

    /// The requested sort order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for unknown sort keys.
    pub fn sort_order(&self) -> Result<SortOrder> {
        self.sort
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e: filter::ParseSortOrderError| AppError::BadRequest(e.to_string()))
    }
}

fn split_values(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Product listing payload.
#[derive(Debug, Serialize)]
pub struct ListingView {
    pub heading: &'static str,
    pub category: Category,
    pub sort: SortOrder,
    pub count: usize,
    pub products: Vec<Product>,
}

/// Display the product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingView>> {
    let filters = query.filter_state()?;
    let sort = query.sort_order()?;

    let products = catalog::load_or_empty(state.catalog()).await;
    let listed = filter::apply(&products, &filters, sort);
    let category = filters.category().unwrap_or_default();

    Ok(Json(ListingView {
        heading: category.heading(),
        category,
        sort,
        count: listed.len(),
        products: listed,
    }))
}
