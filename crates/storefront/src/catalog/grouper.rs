//! Home page catalog derivation: "new" badges and breed groups.

use catfood_core::{Badge, Product};
use indexmap::IndexMap;
use serde::Serialize;

/// Number of leading catalog products marked as new.
pub const NEW_BADGE_COUNT: usize = 5;

/// A product annotated with its tile badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub badge: Option<Badge>,
}

/// Breed tag to the products carrying it, keyed in first-seen order.
pub type BreedGroups = IndexMap<String, Vec<BadgedProduct>>;

/// Everything the home view derives from the catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogGroups {
    pub products: Vec<BadgedProduct>,
    pub breed_groups: BreedGroups,
}

impl CatalogGroups {
    /// Whether there are no breed groups to show yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breed_groups.is_empty()
    }
}

/// Badge the first [`NEW_BADGE_COUNT`] products in catalog order.
#[must_use]
pub fn badge_new_arrivals(products: &[Product]) -> Vec<BadgedProduct> {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| BadgedProduct {
            product: product.clone(),
            badge: (index < NEW_BADGE_COUNT).then_some(Badge::New),
        })
        .collect()
}

/// Partition products by breed tag, skipping the "all" sentinel.
///
/// Each group keeps the relative order of `products`.
#[must_use]
pub fn group_by_breed(products: &[BadgedProduct]) -> BreedGroups {
    let mut groups = BreedGroups::new();
    for item in products {
        for breed in item.product.breed_groups() {
            groups
                .entry(breed.to_string())
                .or_default()
                .push(item.clone());
        }
    }
    groups
}

/// Badge and group a fetched catalog for the home view.
#[must_use]
pub fn group_catalog(products: &[Product]) -> CatalogGroups {
    let products = badge_new_arrivals(products);
    let breed_groups = group_by_breed(&products);
    CatalogGroups {
        products,
        breed_groups,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catfood_core::{BREED_TAG_ALL, Price, ProductId};

    use super::*;

    fn product(id: i64, breeds: &[&str]) -> Product {
        let mut p = Product::new(id, format!("Product {id}"), Price::from_whole(id * 10));
        p.breed_type = breeds.iter().map(|b| (*b).to_string()).collect();
        p
    }

    fn ids(items: &[BadgedProduct]) -> Vec<i64> {
        items.iter().map(|i| i.product.id.as_i64()).collect()
    }

    #[test]
    fn test_badges_mark_prefix_only() {
        let products: Vec<Product> = (1..=8).map(|i| product(i, &[])).collect();
        let badged = badge_new_arrivals(&products);

        assert_eq!(ids(&badged), (1..=8).collect::<Vec<_>>());
        let new: Vec<_> = badged.iter().map(|b| b.badge.is_some()).collect();
        assert_eq!(
            new,
            vec![true, true, true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_badges_short_catalog() {
        let products: Vec<Product> = (1..=3).map(|i| product(i, &[])).collect();
        let badged = badge_new_arrivals(&products);
        assert!(badged.iter().all(|b| b.badge == Some(Badge::New)));
        assert!(badge_new_arrivals(&[]).is_empty());
    }

    #[test]
    fn test_groups_exclude_all_sentinel() {
        let products = vec![
            product(1, &["persian", BREED_TAG_ALL]),
            product(2, &[BREED_TAG_ALL]),
            product(3, &["british_shorthair", "persian"]),
            product(4, &[]),
        ];
        let groups = group_catalog(&products);

        assert!(!groups.breed_groups.contains_key(BREED_TAG_ALL));
        assert_eq!(
            groups.breed_groups.keys().collect::<Vec<_>>(),
            vec!["persian", "british_shorthair"]
        );
        assert_eq!(ids(&groups.breed_groups["persian"]), vec![1, 3]);
        assert_eq!(ids(&groups.breed_groups["british_shorthair"]), vec![3]);

        let grouped: Vec<ProductId> = groups
            .breed_groups
            .values()
            .flatten()
            .map(|i| i.product.id)
            .collect();
        assert!(!grouped.contains(&ProductId::new(2)));
        assert!(!grouped.contains(&ProductId::new(4)));
    }

    #[test]
    fn test_repeated_tag_joins_group_once() {
        let products = vec![product(1, &["persian", "persian"]), product(2, &["persian"])];
        let groups = group_catalog(&products);
        assert_eq!(ids(&groups.breed_groups["persian"]), vec![1, 2]);
    }

    #[test]
    fn test_group_members_carry_badges() {
        let products: Vec<Product> = (1..=6).map(|i| product(i, &["siamese"])).collect();
        let groups = group_catalog(&products);
        let siamese = &groups.breed_groups["siamese"];

        assert_eq!(siamese.len(), 6);
        assert_eq!(siamese[0].badge, Some(Badge::New));
        assert_eq!(siamese[5].badge, None);
    }

    #[test]
    fn test_empty_catalog_has_no_groups() {
        let groups = group_catalog(&[]);
        assert!(groups.is_empty());
        assert!(groups.products.is_empty());
    }

    #[test]
    fn test_badged_product_serializes_flat() {
        let badged = badge_new_arrivals(&[product(7, &["persian"])]);
        let json = serde_json::to_value(&badged[0]).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["badge"], "new");
    }
}
