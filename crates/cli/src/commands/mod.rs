//! Command implementations.
//!
//! Commands write their results to stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

pub mod account;
pub mod admin;
pub mod cart;
pub mod products;

use thiserror::Error;

use techstore_admin::AdminError;
use techstore_storefront::cart::CartError;
use techstore_storefront::catalog::CatalogError;
use techstore_storefront::services::auth::AuthError;
use techstore_storefront::storage::StorageError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront configuration is invalid.
    #[error("{0}")]
    Config(#[from] techstore_storefront::config::ConfigError),

    /// Admin configuration is invalid.
    #[error("{0}")]
    AdminConfig(#[from] techstore_admin::config::ConfigError),

    /// Profile storage failed.
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Admin(#[from] AdminError),

    /// A command argument could not be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested item does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
