//! Cache types for catalog lookups.

use fruit_mall_core::{CategoryId, ProductId};

use super::types::{Category, Product};

/// Cache key for product and category lookups.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Category(CategoryId),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Category(Box<Category>),
    Categories(Vec<Category>),
}
