//! Catalog filter parameters and grouped listing types.
//!
//! All filter inputs arrive as free-form query strings; malformed values
//! fall back to "no filter" instead of rejecting the request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Veg / non-veg filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VegFilter {
    Veg,
    NonVeg,
}

impl VegFilter {
    /// Parses the query value; anything other than the two known markers is
    /// ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "veg" => Some(VegFilter::Veg),
            "nonveg" => Some(VegFilter::NonVeg),
            _ => None,
        }
    }

    pub fn is_veg(&self) -> bool {
        matches!(self, VegFilter::Veg)
    }
}

/// Price bands over the dish price, in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBand {
    /// price <= 200
    Low,
    /// 200 < price <= 400
    Mid,
    /// price > 400
    High,
}

impl PriceBand {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(PriceBand::Low),
            "mid" => Some(PriceBand::Mid),
            "high" => Some(PriceBand::High),
            _ => None,
        }
    }

    /// Exclusive lower and inclusive upper bound of the band.
    pub fn bounds(&self) -> (Option<Decimal>, Option<Decimal>) {
        let two_hundred = Decimal::from(200);
        let four_hundred = Decimal::from(400);
        match self {
            PriceBand::Low => (None, Some(two_hundred)),
            PriceBand::Mid => (Some(two_hundred), Some(four_hundred)),
            PriceBand::High => (Some(four_hundred), None),
        }
    }

    /// Whether a price falls inside this band.
    pub fn contains(&self, price: Decimal) -> bool {
        let (low, high) = self.bounds();
        low.map_or(true, |l| price > l) && high.map_or(true, |h| price <= h)
    }
}

/// Catalog sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "price_asc" => Some(SortKey::PriceAsc),
            "price_desc" => Some(SortKey::PriceDesc),
            "rating" => Some(SortKey::RatingDesc),
            _ => None,
        }
    }
}

/// Fully-parsed catalog filter.
#[derive(Debug, Clone, Default)]
pub struct DishFilter {
    pub query: Option<String>,
    pub veg: Option<VegFilter>,
    pub min_rating: Option<Decimal>,
    pub price_band: Option<PriceBand>,
    pub restaurant_id: Option<Uuid>,
    pub sort: Option<SortKey>,
}

impl DishFilter {
    /// Builds a filter from raw query parameters. Empty strings and values
    /// that fail to parse simply disable the corresponding filter.
    pub fn from_params(
        query: Option<&str>,
        veg: Option<&str>,
        sort: Option<&str>,
        min_rating: Option<&str>,
        price: Option<&str>,
        restaurant: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            query: non_empty(query),
            veg: veg.and_then(VegFilter::parse),
            min_rating: min_rating.and_then(|v| Decimal::from_str(v.trim()).ok()),
            price_band: price.and_then(PriceBand::parse),
            restaurant_id: restaurant.and_then(|v| Uuid::parse_str(v.trim()).ok()),
            sort: sort.and_then(SortKey::parse),
        }
    }
}

/// One dish row in a catalog listing, joined with its restaurant and
/// category names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDish {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub is_veg: bool,
    pub rating: Decimal,
}

/// Dishes of one category when the catalog is scoped to a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    /// `None` marks the trailing "uncategorized" group.
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub dishes: Vec<CatalogDish>,
}

/// Groups a restaurant-scoped listing by category: categories ordered by
/// name, dishes keeping their incoming order, uncategorized dishes last.
pub fn group_by_category(dishes: Vec<CatalogDish>) -> Vec<CategoryGroup> {
    let mut named: Vec<(String, Uuid)> = Vec::new();
    for dish in &dishes {
        if let (Some(id), Some(name)) = (dish.category_id, dish.category_name.as_ref()) {
            if !named.iter().any(|(_, seen)| *seen == id) {
                named.push((name.clone(), id));
            }
        }
    }
    named.sort_by(|a, b| a.0.cmp(&b.0));

    let mut groups: Vec<CategoryGroup> = named
        .into_iter()
        .map(|(name, id)| CategoryGroup {
            category_id: Some(id),
            category_name: Some(name),
            dishes: dishes
                .iter()
                .filter(|d| d.category_id == Some(id))
                .cloned()
                .collect(),
        })
        .collect();

    let uncategorized: Vec<CatalogDish> = dishes
        .iter()
        .filter(|d| d.category_id.is_none())
        .cloned()
        .collect();
    if !uncategorized.is_empty() {
        groups.push(CategoryGroup {
            category_id: None,
            category_name: None,
            dishes: uncategorized,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(name: &str, category: Option<(&str, Uuid)>) -> CatalogDish {
        CatalogDish {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            restaurant_name: "Udupi Grand".to_string(),
            category_id: category.map(|(_, id)| id),
            category_name: category.map(|(n, _)| n.to_string()),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::from(100),
            is_veg: true,
            rating: Decimal::from(4),
        }
    }

    #[test]
    fn test_price_band_boundaries() {
        let band = |s| PriceBand::parse(s).unwrap();
        assert!(band("low").contains(Decimal::from(200)));
        assert!(!band("low").contains(Decimal::from(201)));
        assert!(!band("mid").contains(Decimal::from(200)));
        assert!(band("mid").contains(Decimal::from(201)));
        assert!(band("mid").contains(Decimal::from(400)));
        assert!(!band("high").contains(Decimal::from(400)));
        assert!(band("high").contains(Decimal::from(401)));
    }

    #[test]
    fn test_filter_ignores_malformed_values() {
        let filter = DishFilter::from_params(
            Some("  dosa "),
            Some("carnivore"),
            Some("alphabetical"),
            Some("four-ish"),
            Some("free"),
            Some("not-a-uuid"),
        );
        assert_eq!(filter.query.as_deref(), Some("dosa"));
        assert!(filter.veg.is_none());
        assert!(filter.sort.is_none());
        assert!(filter.min_rating.is_none());
        assert!(filter.price_band.is_none());
        assert!(filter.restaurant_id.is_none());
    }

    #[test]
    fn test_filter_parses_valid_values() {
        let restaurant = Uuid::new_v4();
        let filter = DishFilter::from_params(
            None,
            Some("nonveg"),
            Some("price_desc"),
            Some("4.5"),
            Some("mid"),
            Some(&restaurant.to_string()),
        );
        assert_eq!(filter.veg, Some(VegFilter::NonVeg));
        assert_eq!(filter.sort, Some(SortKey::PriceDesc));
        assert_eq!(filter.min_rating, Some("4.5".parse().unwrap()));
        assert_eq!(filter.price_band, Some(PriceBand::Mid));
        assert_eq!(filter.restaurant_id, Some(restaurant));
    }

    #[test]
    fn test_group_by_category_orders_names_and_trails_uncategorized() {
        let starters = (Uuid::new_v4(), "Starters");
        let mains = (Uuid::new_v4(), "Mains");
        let dishes = vec![
            dish("Gobi 65", Some((starters.1, starters.0))),
            dish("Thali", Some((mains.1, mains.0))),
            dish("Filter Coffee", None),
            dish("Paneer Tikka", Some((starters.1, starters.0))),
        ];

        let groups = group_by_category(dishes);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].category_name.as_deref(), Some("Mains"));
        assert_eq!(groups[1].category_name.as_deref(), Some("Starters"));
        assert_eq!(groups[1].dishes.len(), 2);
        assert!(groups[2].category_name.is_none());
        assert_eq!(groups[2].dishes[0].name, "Filter Coffee");
    }

    #[test]
    fn test_group_by_category_no_uncategorized_group_when_all_categorized() {
        let chaat = (Uuid::new_v4(), "Chaat");
        let groups = group_by_category(vec![dish("Bhel Puri", Some((chaat.1, chaat.0)))]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].category_id.is_some());
    }
}
