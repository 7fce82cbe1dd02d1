//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

use super::validation::ValidationErrors;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more registration fields failed validation.
    #[error("invalid registration: {0}")]
    Validation(ValidationErrors),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Stored accounts could not be read or written.
    #[error("account storage error: {0}")]
    Storage(#[from] StorageError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the error was caused by the submitted input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidCredentials | Self::EmailTaken
        )
    }
}
