//! Core types for Fruit Mall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod price;
pub mod status;

pub use contact::{ContactError, Email, PhoneNumber};
pub use id::*;
pub use price::Price;
pub use status::*;
