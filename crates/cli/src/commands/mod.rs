//! CLI command implementations.

pub mod cart;
pub mod catalog;

use std::path::Path;
use std::sync::Arc;

use catfood_core::{AgeGroup, Category, ProductId};
use catfood_storefront::catalog::{
    CatalogError, CatalogSource, FilterState, HttpCatalog, SortOrder, StaticCatalog,
};
use catfood_storefront::config::{CatalogConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be fetched or parsed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filter or sort argument was not recognized.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested product is not in the catalog.
    #[error("Product {0} not found in catalog")]
    UnknownProduct(ProductId),
}

/// Filter and sort arguments for `products`.
#[derive(Debug, Default)]
pub struct CatalogArgs {
    pub category: Option<String>,
    pub age: Vec<String>,
    pub health: Vec<String>,
    pub breed: Vec<String>,
    pub sort: String,
}

impl CatalogArgs {
    /// Translate the arguments into a filter state and sort order.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for unknown codes.
    pub fn to_filters(&self) -> Result<(FilterState, SortOrder), CliError> {
        let mut filters = FilterState::new();

        if let Some(code) = self.category.as_deref() {
            let category = Category::from_code(code)
                .ok_or_else(|| CliError::InvalidArgument(format!("unknown category '{code}'")))?;
            filters.set_category(Some(category));
        }
        for code in &self.age {
            let age = AgeGroup::from_code(code)
                .ok_or_else(|| CliError::InvalidArgument(format!("unknown age group '{code}'")))?;
            if !filters.ages().contains(&age) {
                filters.toggle_age(age);
            }
        }
        for tag in &self.health {
            if !filters.health_tags().contains(&tag.trim().to_lowercase()) {
                filters.toggle_health(tag);
            }
        }
        for tag in &self.breed {
            if !filters.breed_tags().contains(tag.trim()) {
                filters.toggle_breed(tag);
            }
        }

        let sort = self
            .sort
            .parse::<SortOrder>()
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

        Ok((filters, sort))
    }
}

/// Open the catalog from a JSON file, or from the configured API.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the API
/// configuration is missing.
pub fn open_catalog(file: Option<&Path>) -> Result<Arc<dyn CatalogSource>, CliError> {
    if let Some(path) = file {
        let json = std::fs::read_to_string(path)?;
        return Ok(Arc::new(StaticCatalog::from_json(&json)?));
    }
    let config = CatalogConfig::from_env()?;
    Ok(Arc::new(HttpCatalog::new(&config)))
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
