//! Catalog product record.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{AgeGroup, Category, Price, ProductId};

/// Breed tag meaning "suitable for every breed".
///
/// It never forms a breed group and is compared like any other tag when
/// filtering by breed.
pub const BREED_TAG_ALL: &str = "all";

/// A product as returned by the catalog API.
///
/// Products are immutable once fetched. List-valued fields that the API
/// sends as `null` or omits are treated as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub health: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub breed_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: Category::Unset,
            age_group: AgeGroup::Unset,
            health: Vec::new(),
            breed_type: Vec::new(),
            created_at: None,
            image_url: None,
        }
    }

    /// Distinct breed tags that name an actual breed (everything except
    /// [`BREED_TAG_ALL`]), in first-seen order.
    pub fn breed_groups(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.breed_type
            .iter()
            .map(String::as_str)
            .filter(move |tag| *tag != BREED_TAG_ALL && seen.insert(*tag))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (assumed UTC) or a bare date.
/// Anything else becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": 3,
            "name": "Kitten Mousse",
            "price": 45,
            "category": "wet",
            "age_group": "kitten",
            "health": ["Hairball"],
            "breed_type": ["persian", "all"],
            "created_at": "2025-03-01T08:30:00Z",
            "image_url": "/images/mousse.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Price::from_whole(45));
        assert_eq!(product.category, Category::Wet);
        assert_eq!(product.age_group, AgeGroup::Kitten);
        assert_eq!(product.health, vec!["Hairball".to_string()]);
        assert_eq!(product.created_at.unwrap().to_rfc3339(), "2025-03-01T08:30:00+00:00");
        assert_eq!(product.breed_groups().collect::<Vec<_>>(), vec!["persian"]);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"id": 9, "name": "Plain", "health": null, "category": ""}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.health.is_empty());
        assert!(product.breed_type.is_empty());
        assert_eq!(product.category, Category::Unset);
        assert_eq!(product.price, Price::ZERO);
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2024-11-02 10:15:00").is_some());
        assert!(parse_timestamp("2024-11-02").is_some());
        assert!(parse_timestamp("2024-11-02T10:15:00+07:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_only_all_tag_has_no_groups() {
        let mut product = Product::new(1, "Universal", Price::from_whole(10));
        product.breed_type = vec![BREED_TAG_ALL.to_string()];
        assert_eq!(product.breed_groups().count(), 0);
    }

    #[test]
    fn test_duplicate_breed_tags_collapse() {
        let mut product = Product::new(1, "Persian Blend", Price::from_whole(10));
        product.breed_type = ["persian", "all", "persian", "siamese"]
            .map(String::from)
            .to_vec();
        assert_eq!(
            product.breed_groups().collect::<Vec<_>>(),
            vec!["persian", "siamese"]
        );
    }
}
