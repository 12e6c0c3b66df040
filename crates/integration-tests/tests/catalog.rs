//! Browsing the catalog against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::PathBuf;

use fruit_mall_core::{CategoryId, Price, ProductId};
use fruit_mall_integration_tests::FakeBackend;
use fruit_mall_storefront::catalog::{CatalogFilters, CatalogQuery, CatalogSort};
use fruit_mall_storefront::api::ApiClient;
use fruit_mall_storefront::state::{CatalogSource, CatalogStore, LoadStatus};
use fruit_mall_storefront::storage::MemoryTokenStore;

#[tokio::test]
async fn test_thirteen_products_paginate_by_twelve() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());
    ctx.load_products().await.unwrap();

    let first = ctx.catalog_page();
    assert_eq!(first.items.len(), 12);
    assert_eq!(first.total_matches, 13);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next());

    ctx.set_page(2);
    let second = ctx.catalog_page();
    assert_eq!(second.items.len(), 1);
    // Newest first, so the oldest product is last.
    assert_eq!(second.items[0].id, ProductId::new(1));
    assert!(!second.has_next());

    ctx.set_page(3);
    assert!(ctx.catalog_page().items.is_empty());
}

#[tokio::test]
async fn test_filters_and_sort() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());
    ctx.load_products().await.unwrap();

    ctx.set_query(CatalogQuery {
        filters: CatalogFilters {
            origin: Some("Jeju".to_string()),
            max_price: Some(Price::from_won(35_000)),
            ..CatalogFilters::default()
        },
        sort: CatalogSort::PriceAsc,
        page: 1,
    });
    let names: Vec<String> = ctx
        .catalog_page()
        .items
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Tangerine", "Hallabong"]);

    let facets = ctx.catalog().facets();
    assert_eq!(facets.categories.len(), 3);
    assert!(facets.origins.contains(&"Philippines".to_string()));
}

#[tokio::test]
async fn test_home_shows_eight_newest() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());

    let newest = ctx.home().await.unwrap();
    assert_eq!(newest.len(), 8);
    assert_eq!(newest[0].id, ProductId::new(13));
    assert_eq!(newest[7].id, ProductId::new(6));

    // Already loaded: no second fetch.
    ctx.home().await.unwrap();
    assert_eq!(backend.requests(), vec!["GET /api/fruits"]);
}

#[tokio::test]
async fn test_home_refetches_after_failed_load() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());
    backend.fail_once("GET /api/fruits");

    assert!(ctx.home().await.is_err());
    assert!(ctx.catalog().product_state().error().is_some());

    let newest = ctx.home().await.unwrap();
    assert_eq!(newest.len(), 8);
    assert_eq!(ctx.catalog().product_state().status(), &LoadStatus::Loaded);
    assert_eq!(backend.requests(), vec!["GET /api/fruits", "GET /api/fruits"]);
}

#[tokio::test]
async fn test_overlapping_listings_keep_the_latest() {
    let backend = FakeBackend::start().await;
    let api = ApiClient::new(&backend.config(PathBuf::from("unused.json")).api).unwrap();
    let mut store = CatalogStore::default();

    let search = store.begin_products(CatalogSource::Search("berry".to_string()));
    let all = store.begin_products(CatalogSource::All);
    let (berries, everything) = tokio::join!(api.search_products("berry"), api.list_products());

    // The newer listing settles first, the older one afterwards.
    assert!(store.products_loaded(all, everything.unwrap()));
    assert!(!store.products_loaded(search, berries.unwrap()));
    assert_eq!(store.products().len(), 13);
    assert_eq!(store.source(), &CatalogSource::All);
}

#[tokio::test]
async fn test_search_and_category_listings() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());

    ctx.search("berry").await.unwrap();
    assert_eq!(
        ctx.catalog().source(),
        &CatalogSource::Search("berry".to_string())
    );
    assert_eq!(ctx.catalog().products().len(), 3);
    assert!(
        backend
            .requests()
            .contains(&"GET /api/fruits/search".to_string())
    );

    let category = ctx.load_category(CategoryId::new(3)).await.unwrap();
    assert_eq!(category.name, "Tropical");
    assert_eq!(ctx.catalog().products().len(), 5);

    ctx.load_categories().await.unwrap();
    assert_eq!(ctx.catalog().categories().len(), 3);
}

#[tokio::test]
async fn test_product_lookups_are_cached() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());

    let first = ctx.product(ProductId::new(9)).await.unwrap();
    let second = ctx.product(ProductId::new(9)).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(backend.requests(), vec!["GET /api/fruits/9"]);

    let err = ctx.product(ProductId::new(99)).await.unwrap_err();
    assert_eq!(err.user_message(), "Fruit not found");
}
