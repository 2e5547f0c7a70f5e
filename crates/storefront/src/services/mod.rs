//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Add-to-cart and line changes against the shop's AJAX cart

pub mod cart;

pub use cart::{AddToCartInput, AddToCartOutcome, CartService, CartSnapshot, LocalCartItem};
