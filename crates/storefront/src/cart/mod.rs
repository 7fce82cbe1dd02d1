//! Shopping cart state container.
//!
//! The [`CartStore`] is the single source of truth for cart contents. Every
//! surface that shows or changes the cart (navigation badge, product grid,
//! cart page, CLI) holds a clone of the same store handle:
//!
//! - mutations are atomic and are written through to [`Storage`] before they
//!   return
//! - readers get copies ([`CartStore::items`]) or derived values
//!   ([`CartStore::item_count`], [`CartStore::total`])
//! - [`CartStore::subscribe`] hands out a receiver that always holds the
//!   latest post-mutation [`CartSnapshot`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rust_decimal::Decimal;
//! use serde_json::json;
//! use techstore_storefront::cart::CartStore;
//! use techstore_storefront::storage::MemoryStorage;
//!
//! let cart = CartStore::open(Arc::new(MemoryStorage::new()));
//! cart.add_item(&json!({"id": "p1", "price": 10})).unwrap();
//! cart.add_item(&json!({"id": "p1", "price": 10})).unwrap();
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total(), Decimal::from(20));
//!
//! cart.set_quantity(&"p1".into(), 0);
//! assert!(cart.items().is_empty());
//! ```
//!
//! [`Storage`]: crate::storage::Storage

mod line_item;
mod store;

pub use line_item::LineItem;
pub use store::{CartSnapshot, CartStore};

use thiserror::Error;

/// Errors reported by cart operations.
///
/// Storage failures are not among them: a failed write is logged and the
/// in-memory mutation is kept.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product handed to the cart cannot become a line item.
    #[error("invalid product: {0}")]
    InvalidInput(String),
}
