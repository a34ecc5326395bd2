//! Home page route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{self, BadgedProduct, BreedGroups, grouper};
use crate::state::AppState;

/// Message shown in place of breed tiles when the catalog has none.
pub const NO_GROUPS_MESSAGE: &str = "No breed groups yet";

/// Home page payload.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub products: Vec<BadgedProduct>,
    pub breed_groups: BreedGroups,
    /// Set when there are no breed groups to show.
    pub empty_state: Option<&'static str>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Json<HomeView> {
    let products = catalog::load_or_empty(state.catalog()).await;
    let groups = grouper::group_catalog(&products);
    let empty_state = groups.is_empty().then_some(NO_GROUPS_MESSAGE);

    Json(HomeView {
        products: groups.products,
        breed_groups: groups.breed_groups,
        empty_state,
    })
}
