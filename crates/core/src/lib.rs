//! Catfood Core - Shared types library.
//!
//! This crate provides the domain types used across all storefront components:
//! - `storefront` - Catalog listing, breed groups and the shopping cart service
//! - `cli` - Command-line access to the same catalog and cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog enums and the product record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
