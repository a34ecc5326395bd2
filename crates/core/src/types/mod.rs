//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use price::Price;
pub use product::{BREED_TAG_ALL, Product};
pub use status::*;
