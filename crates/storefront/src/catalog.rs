//! Client-side filtering, sorting and pagination of the product catalog.
//!
//! The backend returns the whole catalog at once; every view over it
//! (product list, category page, search results, home page) is computed
//! here from the in-memory list.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use fruit_mall_core::{CategoryId, Price};

use crate::api::Product;

/// Products per catalog page.
pub const PRODUCTS_PER_PAGE: usize = 12;

/// Products shown on the home page.
pub const HOME_NEWEST_COUNT: usize = 8;

// =============================================================================
// Filters
// =============================================================================

/// Catalog filters. Every set filter must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    /// Only products in this category.
    pub category: Option<CategoryId>,
    /// Exact origin, e.g. "Jeju".
    pub origin: Option<String>,
    /// Exact season, e.g. "SUMMER".
    pub season: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    pub max_price: Option<Price>,
    /// Case-insensitive substring of the product name. Blank means unset.
    pub keyword: Option<String>,
}

impl CatalogFilters {
    /// Whether `product` passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|id| product.category_id != id) {
            return false;
        }
        if self
            .origin
            .as_deref()
            .is_some_and(|origin| product.origin != origin)
        {
            return false;
        }
        if self
            .season
            .as_deref()
            .is_some_and(|season| product.season != season)
        {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        match self.normalized_keyword() {
            Some(keyword) => product.name.to_lowercase().contains(&keyword),
            None => true,
        }
    }

    /// Whether any filter is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || self.origin.is_some()
            || self.season.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.normalized_keyword().is_some()
    }

    fn normalized_keyword(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
    }
}

// =============================================================================
// Sort
// =============================================================================

/// Sort order for the product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSort {
    /// Most recently added first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Alphabetical by name.
    NameAsc,
    /// Reverse alphabetical by name.
    NameDesc,
}

impl CatalogSort {
    /// All sort orders, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    /// Parse a sort key. Unknown keys fall back to `Newest`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-asc" | "priceAsc" | "price_asc" => Self::PriceAsc,
            "price-desc" | "priceDesc" | "price_desc" => Self::PriceDesc,
            "name-asc" | "nameAsc" | "name_asc" => Self::NameAsc,
            "name-desc" | "nameDesc" | "name_desc" => Self::NameDesc,
            _ => Self::Newest,
        }
    }

    /// Key used in URLs and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
        }
    }

    /// Compare two products under this order. Equal keys compare `Equal`
    /// so a stable sort keeps their original relative order.
    #[must_use]
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
        }
    }
}

impl std::fmt::Display for CatalogSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CatalogSort {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

// =============================================================================
// Query
// =============================================================================

/// Filters, sort order and page of a catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub filters: CatalogFilters,
    pub sort: CatalogSort,
    /// 1-based page number. Page 0 is treated as page 1.
    pub page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            filters: CatalogFilters::default(),
            sort: CatalogSort::default(),
            page: 1,
        }
    }
}

impl CatalogQuery {
    /// The page number actually served.
    #[must_use]
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }
}

/// One page of a catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    /// Products on this page, at most [`PRODUCTS_PER_PAGE`].
    pub items: Vec<Product>,
    /// 1-based page number served.
    pub page: usize,
    /// Products matching the filters across all pages.
    pub total_matches: usize,
    /// Number of non-empty pages.
    pub total_pages: usize,
}

impl CatalogPage {
    /// Whether a later page has products.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Filter, sort and paginate `products`.
///
/// Requesting a page past the last one yields an empty page, not an error.
#[must_use]
pub fn query(products: &[Product], query: &CatalogQuery) -> CatalogPage {
    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|p| query.filters.matches(p))
        .collect();
    // `sort_by` is stable: ties keep catalog order.
    matches.sort_by(|a, b| query.sort.compare(a, b));

    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(PRODUCTS_PER_PAGE);
    let page = query.effective_page();

    let items = matches
        .into_iter()
        .skip((page - 1).saturating_mul(PRODUCTS_PER_PAGE))
        .take(PRODUCTS_PER_PAGE)
        .cloned()
        .collect();

    CatalogPage {
        items,
        page,
        total_matches,
        total_pages,
    }
}

/// The `count` most recently added products, newest first.
#[must_use]
pub fn newest(products: &[Product], count: usize) -> Vec<Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by(|a, b| CatalogSort::Newest.compare(a, b));
    sorted.into_iter().take(count).cloned().collect()
}

// =============================================================================
// Facets
// =============================================================================

/// Filter options available in a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    /// Distinct origins, sorted.
    pub origins: Vec<String>,
    /// Distinct seasons, sorted.
    pub seasons: Vec<String>,
    /// Distinct categories, sorted by name.
    pub categories: Vec<(CategoryId, String)>,
    /// Cheapest and most expensive price, if any products exist.
    pub price_range: Option<(Price, Price)>,
}

/// Collect the filter options offered by `products`.
#[must_use]
pub fn facets(products: &[Product]) -> Facets {
    let origins: BTreeSet<&str> = products
        .iter()
        .map(|p| p.origin.as_str())
        .filter(|o| !o.is_empty())
        .collect();
    let seasons: BTreeSet<&str> = products
        .iter()
        .map(|p| p.season.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    let mut by_id: BTreeMap<CategoryId, &str> = BTreeMap::new();
    for product in products {
        by_id
            .entry(product.category_id)
            .or_insert(product.category_name.as_str());
    }
    let mut categories: Vec<(CategoryId, String)> = by_id
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();
    categories.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));

    let price_range = products
        .iter()
        .map(|p| p.price)
        .min()
        .zip(products.iter().map(|p| p.price).max());

    Facets {
        origins: origins.into_iter().map(String::from).collect(),
        seasons: seasons.into_iter().map(String::from).collect(),
        categories,
        price_range,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use fruit_mall_core::ProductId;
    use proptest::prelude::*;

    use super::*;

    fn at_day(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn product(id: i64, name: &str, price: i64, category: i64, day: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            origin: if id % 2 == 0 { "Jeju" } else { "Gyeongbuk" }.to_string(),
            stock_quantity: 10,
            price: Price::from_won(price),
            category_id: CategoryId::new(category),
            category_name: format!("Category {category}"),
            season: if id % 3 == 0 { "WINTER" } else { "SUMMER" }.to_string(),
            description: None,
            image_url: None,
            created_at: at_day(day),
            updated_at: None,
        }
    }

    fn ids(items: &[Product]) -> Vec<i64> {
        items.iter().map(|p| p.id.as_i64()).collect()
    }

    fn thirteen() -> Vec<Product> {
        (1..=13)
            .map(|i| product(i, &format!("Fruit {i}"), 1_000 * i, 1, u32::try_from(i).unwrap()))
            .collect()
    }

    #[test]
    fn test_thirteen_products_paginate_to_twelve_and_one() {
        let products = thirteen();
        let mut q = CatalogQuery::default();

        let first = query(&products, &q);
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.total_matches, 13);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next());

        q.page = 2;
        let second = query(&products, &q);
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_next());

        q.page = 3;
        let third = query(&products, &q);
        assert!(third.items.is_empty());
        assert_eq!(third.total_pages, 2);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let products = thirteen();
        let q = CatalogQuery {
            page: 0,
            ..CatalogQuery::default()
        };
        let page = query(&products, &q);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 12);
    }

    #[test]
    fn test_newest_is_default_sort() {
        let products = thirteen();
        let page = query(&products, &CatalogQuery::default());
        assert_eq!(page.items[0].id, ProductId::new(13));
        assert_eq!(ids(&newest(&products, 3)), vec![13, 12, 11]);
    }

    #[test]
    fn test_keyword_is_trimmed_and_case_insensitive() {
        let products = vec![
            product(1, "Jeju Tangerine", 12_000, 1, 1),
            product(2, "Shine Muscat", 25_000, 2, 2),
            product(3, "Tangerine Juice", 8_000, 1, 3),
        ];
        let q = CatalogQuery {
            filters: CatalogFilters {
                keyword: Some("  TANGERINE ".to_string()),
                ..CatalogFilters::default()
            },
            sort: CatalogSort::NameAsc,
            page: 1,
        };
        assert_eq!(ids(&query(&products, &q).items), vec![1, 3]);

        let blank = CatalogFilters {
            keyword: Some("   ".to_string()),
            ..CatalogFilters::default()
        };
        assert!(!blank.is_active());
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let products = vec![
            product(2, "Apple", 10_000, 1, 1),
            product(4, "Pear", 30_000, 1, 2),
            product(6, "Peach", 20_000, 2, 3),
            product(1, "Grape", 20_000, 1, 4),
        ];
        let q = CatalogQuery {
            filters: CatalogFilters {
                category: Some(CategoryId::new(1)),
                origin: Some("Jeju".to_string()),
                min_price: Some(Price::from_won(10_000)),
                max_price: Some(Price::from_won(20_000)),
                ..CatalogFilters::default()
            },
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query(&products, &q).items), vec![2]);
    }

    #[test]
    fn test_price_sort_is_stable_for_ties() {
        let products = vec![
            product(1, "B", 5_000, 1, 1),
            product(2, "A", 3_000, 1, 2),
            product(3, "C", 5_000, 1, 3),
            product(4, "D", 3_000, 1, 4),
        ];
        let asc = CatalogQuery {
            sort: CatalogSort::PriceAsc,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query(&products, &asc).items), vec![2, 4, 1, 3]);

        let desc = CatalogQuery {
            sort: CatalogSort::PriceDesc,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query(&products, &desc).items), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let products = vec![
            product(1, "banana", 1, 1, 1),
            product(2, "Apple", 1, 1, 2),
            product(3, "cherry", 1, 1, 3),
        ];
        let q = CatalogQuery {
            sort: CatalogSort::NameDesc,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query(&products, &q).items), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(CatalogSort::parse("price-asc"), CatalogSort::PriceAsc);
        assert_eq!(CatalogSort::parse("priceDesc"), CatalogSort::PriceDesc);
        assert_eq!(CatalogSort::parse("name-desc"), CatalogSort::NameDesc);
        assert_eq!(CatalogSort::parse("popular"), CatalogSort::Newest);
        for sort in CatalogSort::ALL {
            assert_eq!(CatalogSort::parse(sort.as_str()), sort);
        }
    }

    #[test]
    fn test_facets() {
        let products = vec![
            product(1, "A", 9_000, 2, 1),
            product(2, "B", 1_000, 1, 2),
            product(3, "C", 5_000, 2, 3),
        ];
        let facets = facets(&products);
        assert_eq!(facets.origins, vec!["Gyeongbuk", "Jeju"]);
        assert_eq!(facets.seasons, vec!["SUMMER", "WINTER"]);
        assert_eq!(
            facets.categories,
            vec![
                (CategoryId::new(1), "Category 1".to_string()),
                (CategoryId::new(2), "Category 2".to_string())
            ]
        );
        assert_eq!(
            facets.price_range,
            Some((Price::from_won(1_000), Price::from_won(9_000)))
        );
        assert_eq!(super::facets(&[]).price_range, None);
    }

    fn arb_product() -> impl Strategy<Value = Product> {
        (
            1i64..1_000,
            "[a-zA-Z ]{1,12}",
            0i64..100_000,
            1i64..4,
            1u32..28,
        )
            .prop_map(|(id, name, price, category, day)| product(id, &name, price, category, day))
    }

    fn arb_filters() -> impl Strategy<Value = CatalogFilters> {
        (
            prop::option::of(1i64..4),
            prop::option::of(prop::sample::select(vec!["Jeju", "Gyeongbuk", "Busan"])),
            prop::option::of(prop::sample::select(vec!["SUMMER", "WINTER"])),
            prop::option::of(0i64..100_000),
            prop::option::of(0i64..100_000),
            prop::option::of("[a-zA-Z ]{0,3}"),
        )
            .prop_map(|(category, origin, season, min, max, keyword)| CatalogFilters {
                category: category.map(CategoryId::new),
                origin: origin.map(String::from),
                season: season.map(String::from),
                min_price: min.map(Price::from_won),
                max_price: max.map(Price::from_won),
                keyword,
            })
    }

    fn arb_sort() -> impl Strategy<Value = CatalogSort> {
        prop::sample::select(CatalogSort::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_page_is_filtered_sorted_and_bounded(
            products in prop::collection::vec(arb_product(), 0..40),
            filters in arb_filters(),
            sort in arb_sort(),
            page in 0usize..6,
        ) {
            let q = CatalogQuery { filters, sort, page };
            let result = query(&products, &q);

            prop_assert!(result.items.len() <= PRODUCTS_PER_PAGE);
            for item in &result.items {
                prop_assert!(q.filters.matches(item));
                prop_assert!(products.contains(item));
            }
            for pair in result.items.windows(2) {
                prop_assert_ne!(q.sort.compare(&pair[0], &pair[1]), Ordering::Greater);
            }

            let expected = products.iter().filter(|p| q.filters.matches(p)).count();
            prop_assert_eq!(result.total_matches, expected);
        }

        #[test]
        fn prop_pages_partition_matches(
            products in prop::collection::vec(arb_product(), 0..40),
            sort in arb_sort(),
        ) {
            let first = query(&products, &CatalogQuery { sort, ..CatalogQuery::default() });
            let mut seen = 0;
            for page in 1..=first.total_pages + 1 {
                let result = query(&products, &CatalogQuery { sort, page, ..CatalogQuery::default() });
                seen += result.items.len();
                if page > first.total_pages {
                    prop_assert!(result.items.is_empty());
                }
            }
            prop_assert_eq!(seen, products.len());
        }
    }
}
