//! Login session persisted in durable storage.
//!
//! A session is the logged-in [`AccountSummary`] stored as JSON under the
//! `sesion` key. Its presence alone decides whether someone is logged in.
//! The session also remembers where to send the user back after login.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::AccountSummary;
use crate::storage::{Storage, StorageError, keys};

/// Where to go after login when no return path was remembered.
pub const DEFAULT_RETURN_PATH: &str = "/";

/// Session handle over durable storage.
///
/// Cheap to clone; all clones share the same storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Create a session store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Open a session for `account`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    pub fn login(&self, account: &AccountSummary) -> Result<(), StorageError> {
        let json = serde_json::to_string(account)?;
        self.storage.write(keys::SESSION, &json)?;

        set_sentry_user(&account.id, Some(account.email.as_str()));
        add_breadcrumb("auth", "Logged in", None);
        debug!(account_id = %account.id, "Session opened");
        Ok(())
    }

    /// Close the current session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::SESSION)?;

        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        debug!("Session closed");
        Ok(())
    }

    /// Whether a session is stored.
    ///
    /// Unreadable storage counts as logged out.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        match self.storage.read(keys::SESSION) {
            Ok(value) => value.is_some(),
            Err(e) => {
                warn!(error = %e, "Could not read session");
                false
            }
        }
    }

    /// The logged-in account.
    ///
    /// A session that cannot be read or parsed is logged and treated as
    /// absent.
    #[must_use]
    pub fn current(&self) -> Option<AccountSummary> {
        let raw = match self.storage.read(keys::SESSION) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Could not read session");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(account) => Some(account),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session");
                None
            }
        }
    }

    /// Remember the path a logged-out user tried to visit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the path cannot be written.
    pub fn remember_return_path(&self, path: &str) -> Result<(), StorageError> {
        self.storage.write(keys::RETURN_PATH, path)
    }

    /// Take the remembered return path, falling back to `/`.
    ///
    /// The remembered path is cleared so it is only used once.
    #[must_use]
    pub fn take_return_path(&self) -> String {
        let path = match self.storage.read(keys::RETURN_PATH) {
            Ok(path) => path.filter(|p| !p.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read return path");
                None
            }
        };

        if path.is_some()
            && let Err(e) = self.storage.remove(keys::RETURN_PATH)
        {
            warn!(error = %e, "Could not clear return path");
        }

        path.unwrap_or_else(|| DEFAULT_RETURN_PATH.to_string())
    }
}
