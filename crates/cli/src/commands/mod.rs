//! Subcommand implementations.
//!
//! Each command drives the [`AppContext`](fruit_mall_storefront::AppContext)
//! and hands the outcome to [`crate::render`].

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod reviews;
pub mod wishlist;
