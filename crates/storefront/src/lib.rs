//! Fruit Mall Storefront library.
//!
//! Client-side state and backend access for the Fruit Mall marketplace:
//! a REST client, persisted token storage, latest-request-wins stores, and
//! the derived views (catalog pages, cart totals, reviewable order lines)
//! that front ends render. [`context::AppContext`] ties them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod profile;
pub mod reviews;
pub mod routes;
pub mod state;
pub mod storage;

pub use context::AppContext;
pub use error::{AppError, Result};
