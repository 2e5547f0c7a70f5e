//! CozySpot Core - Shared types library.
//!
//! This crate provides the product and money types used by the storefront
//! resolver and its API:
//! - `storefront` - Resolution pipeline, platform clients, JSON API
//! - `integration-tests` - End-to-end tests against mocked platforms
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money normalization, product records, display models,
//!   asset URLs and platform IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
