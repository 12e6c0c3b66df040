//! Product catalog store.

use fruit_mall_core::CategoryId;

use crate::api::{Category, Product};
use crate::catalog::{self, CatalogPage, CatalogQuery, Facets};

use super::{Loadable, RequestTicket};

/// Which backend listing the cached products came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// Nothing fetched yet.
    #[default]
    None,
    /// The whole catalog.
    All,
    /// One category's products.
    Category(CategoryId),
    /// Backend keyword search results.
    Search(String),
}

/// Fetched products and categories plus the active list query.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: Loadable<Vec<Product>>,
    source: CatalogSource,
    categories: Loadable<Vec<Category>>,
    query: CatalogQuery,
}

impl CatalogStore {
    /// The fetched product list.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.products.data()
    }

    /// Request state of the product list.
    #[must_use]
    pub const fn product_state(&self) -> &Loadable<Vec<Product>> {
        &self.products
    }

    /// Which listing the products came from.
    #[must_use]
    pub const fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// The fetched categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        self.categories.data()
    }

    /// Request state of the category list.
    #[must_use]
    pub const fn category_state(&self) -> &Loadable<Vec<Category>> {
        &self.categories
    }

    /// The active filter, sort and page.
    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Replace the active query.
    pub fn set_query(&mut self, query: CatalogQuery) {
        self.query = query;
    }

    /// Move to another page of the active query.
    pub const fn set_page(&mut self, page: usize) {
        self.query.page = page;
    }

    /// The active query applied to the fetched products.
    #[must_use]
    pub fn page(&self) -> CatalogPage {
        catalog::query(self.products(), &self.query)
    }

    /// Filter options for the fetched products.
    #[must_use]
    pub fn facets(&self) -> Facets {
        catalog::facets(self.products())
    }

    /// The most recently added of the fetched products.
    #[must_use]
    pub fn newest(&self, count: usize) -> Vec<Product> {
        catalog::newest(self.products(), count)
    }

    /// Start fetching products from `source`.
    pub fn begin_products(&mut self, source: CatalogSource) -> RequestTicket {
        self.source = source;
        self.products.begin()
    }

    /// Store fetched products.
    pub fn products_loaded(&mut self, ticket: RequestTicket, products: Vec<Product>) -> bool {
        self.products.fulfil(ticket, products)
    }

    /// Record a failed product fetch.
    pub fn products_failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        self.products.reject(ticket, message)
    }

    /// Start fetching categories.
    pub fn begin_categories(&mut self) -> RequestTicket {
        self.categories.begin()
    }

    /// Store fetched categories.
    pub fn categories_loaded(&mut self, ticket: RequestTicket, categories: Vec<Category>) -> bool {
        self.categories.fulfil(ticket, categories)
    }

    /// Record a failed category fetch.
    pub fn categories_failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        self.categories.reject(ticket, message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use fruit_mall_core::{Price, ProductId};

    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Fruit {id}"),
            origin: "Jeju".to_string(),
            stock_quantity: 1,
            price: Price::from_won(1_000),
            category_id: CategoryId::new(1),
            category_name: "Citrus".to_string(),
            season: "WINTER".to_string(),
            description: None,
            image_url: None,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_stale_search_does_not_overwrite_newer_listing() {
        let mut store = CatalogStore::default();
        let search = store.begin_products(CatalogSource::Search("apple".to_string()));
        let category = store.begin_products(CatalogSource::Category(CategoryId::new(1)));

        assert!(store.products_loaded(category, vec![product(1), product(2)]));
        assert!(!store.products_loaded(search, vec![product(9)]));

        assert_eq!(store.products().len(), 2);
        assert_eq!(store.source(), &CatalogSource::Category(CategoryId::new(1)));
    }

    #[test]
    fn test_page_uses_active_query() {
        let mut store = CatalogStore::default();
        let t = store.begin_products(CatalogSource::All);
        store.products_loaded(t, (1..=13).map(product).collect());

        assert_eq!(store.page().items.len(), 12);
        store.set_page(2);
        assert_eq!(store.page().items.len(), 1);
    }
}
