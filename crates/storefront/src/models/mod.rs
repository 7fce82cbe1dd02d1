//! Domain models for the storefront.

pub mod account;

pub use account::{Account, AccountSummary, RegistrationForm};
