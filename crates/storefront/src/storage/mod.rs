//! Durable key-value storage.
//!
//! Everything the storefront remembers between runs (cart, session, local
//! accounts) lives in a [`Storage`] under one of the fixed [`keys`]. Values
//! are serialized strings; each consumer owns the format of its key.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local map, for tests and throwaway profiles
//! - [`FileStorage`] - one JSON document per profile directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Keys under which the storefront persists its state.
pub mod keys {
    /// Serialized cart line items.
    pub const CART: &str = "cart";

    /// Account summary of the logged-in user.
    pub const SESSION: &str = "sesion";

    /// Path to return to after a successful login.
    pub const RETURN_PATH: &str = "previousPath";

    /// Locally registered accounts.
    pub const ACCOUNTS: &str = "usuarios";
}

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or otherwise refusing access.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing document could not be parsed.
    #[error("corrupt storage document {path}: {source}")]
    Corrupt {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A key-value durable storage facility.
///
/// All methods take `&self`; implementations use interior mutability so a
/// single backend can be shared by every store through an `Arc`.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
