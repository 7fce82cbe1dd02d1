//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and password login

pub mod auth;
