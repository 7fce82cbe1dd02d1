//! Account domain types.
//!
//! Accounts are persisted as a JSON array under the `usuarios` storage key.
//! The field names on disk (`documento`, `nombres`, `apellidos`) are kept
//! stable so existing profiles keep loading.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use techstore_core::{AccountId, Email};

/// A registered storefront account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// National identity document number (8-11 digits).
    #[serde(rename = "documento")]
    pub document: String,
    /// Given names.
    #[serde(rename = "nombres")]
    pub first_names: String,
    /// Family names.
    #[serde(rename = "apellidos")]
    pub last_names: String,
    /// Login email address.
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Full display name ("first last").
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_names.trim(), self.last_names.trim())
    }

    /// Session-safe view of this account.
    #[must_use]
    pub fn summary(&self, logged_in_at: DateTime<Utc>) -> AccountSummary {
        AccountSummary {
            id: self.id,
            first_names: self.first_names.clone(),
            last_names: self.last_names.clone(),
            email: self.email.clone(),
            logged_in_at,
        }
    }
}

/// Session-stored account identity.
///
/// Minimal data stored in the session to identify the logged-in account;
/// never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account ID.
    pub id: AccountId,
    /// Given names.
    #[serde(rename = "nombres")]
    pub first_names: String,
    /// Family names.
    #[serde(rename = "apellidos")]
    pub last_names: String,
    /// Login email address.
    pub email: Email,
    /// When the session was opened.
    pub logged_in_at: DateTime<Utc>,
}

/// Raw registration input, validated by
/// [`AccountService::register`](crate::services::auth::AccountService::register).
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub document: String,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub password: SecretString,
}
