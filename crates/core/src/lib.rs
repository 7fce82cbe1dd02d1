//! techstore core - Shared types library.
//!
//! This crate provides common types used across all techstore components:
//! - `storefront` - Cart store, durable storage, session, accounts and catalog
//! - `admin` - Client for the demo administration API
//! - `cli` - Command-line surface over a file-backed profile
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
