//! Listing filter and sort engine.
//!
//! Dimensions combine with AND; values selected within one dimension combine
//! with OR. An empty selection in a dimension lets everything through.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::str::FromStr;

use catfood_core::{AgeGroup, Category, Product};
use serde::{Deserialize, Serialize};

/// Currently selected listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    category: Option<Category>,
    age: HashSet<AgeGroup>,
    health: HashSet<String>,
    breed: HashSet<String>,
}

impl FilterState {
    /// A filter state that passes every product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one category, or clear the restriction with `None`.
    ///
    /// `Some(Category::Unset)` is treated as no restriction.
    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category.filter(|c| *c != Category::Unset);
    }

    /// Builder form of [`set_category`](Self::set_category).
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.set_category(Some(category));
        self
    }

    /// Select an age group if unselected, deselect it otherwise.
    pub fn toggle_age(&mut self, age: AgeGroup) {
        toggle(&mut self.age, age);
    }

    /// Select a health tag if unselected, deselect it otherwise.
    ///
    /// Tags are compared case-insensitively.
    pub fn toggle_health(&mut self, tag: &str) {
        toggle(&mut self.health, tag.trim().to_lowercase());
    }

    /// Select a breed tag if unselected, deselect it otherwise.
    pub fn toggle_breed(&mut self, tag: &str) {
        toggle(&mut self.breed, tag.trim().to_string());
    }

    /// Clear every dimension.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The selected category, if any.
    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        self.category
    }

    /// Selected age groups.
    #[must_use]
    pub const fn ages(&self) -> &HashSet<AgeGroup> {
        &self.age
    }

    /// Selected health tags (lower-cased).
    #[must_use]
    pub const fn health_tags(&self) -> &HashSet<String> {
        &self.health
    }

    /// Selected breed tags.
    #[must_use]
    pub const fn breed_tags(&self) -> &HashSet<String> {
        &self.breed
    }

    /// Whether no dimension restricts anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.age.is_empty()
            && self.health.is_empty()
            && self.breed.is_empty()
    }

    /// Whether `product` passes every active dimension.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.is_none_or(|c| product.category == c)
            && (self.age.is_empty() || self.age.contains(&product.age_group))
            && (self.health.is_empty()
                || product
                    .health
                    .iter()
                    .any(|h| self.health.contains(&h.to_lowercase())))
            && (self.breed.is_empty() || product.breed_type.iter().any(|b| self.breed.contains(b)))
    }
}

fn toggle<T: Eq + std::hash::Hash>(set: &mut HashSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep catalog order.
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    /// Most recently created first; undated products last.
    Newest,
}

/// Error parsing a [`SortOrder`] from a query string value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct ParseSortOrderError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

impl SortOrder {
    /// Return a sorted copy of `products`. The sort is stable.
    #[must_use]
    pub fn sorted(self, products: &[Product]) -> Vec<Product> {
        let mut sorted = products.to_vec();
        match self {
            Self::None => {}
            Self::PriceAsc => sorted.sort_by_key(|p| p.price),
            Self::PriceDesc => sorted.sort_by_key(|p| Reverse(p.price)),
            // `None < Some(_)`, so reversing puts undated products last
            Self::Newest => sorted.sort_by_key(|p| Reverse(p.created_at)),
        }
        sorted
    }
}

/// Products passing `filters`, in catalog order.
#[must_use]
pub fn filter_products(products: &[Product], filters: &FilterState) -> Vec<Product> {
    products
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect()
}

/// Filter then sort, producing the listing view.
#[must_use]
pub fn apply(products: &[Product], filters: &FilterState, sort: SortOrder) -> Vec<Product> {
    sort.sorted(&filter_products(products, filters))
}
