//! Account service.
//!
//! Local registration and password login. Accounts live in durable storage
//! under the `usuarios` key; passwords are stored only as Argon2 hashes.

mod error;
pub mod validation;

pub use error::AuthError;
pub use validation::{Field, FieldError, ValidationErrors};

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use techstore_core::AccountId;

use crate::models::{Account, AccountSummary, RegistrationForm};
use crate::session::SessionStore;
use crate::storage::{Storage, StorageError, keys};

/// Account service.
///
/// Handles registration and login, opening the session on successful login.
#[derive(Debug, Clone)]
pub struct AccountService {
    storage: Arc<dyn Storage>,
    session: SessionStore,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(storage: Arc<dyn Storage>, session: SessionStore) -> Self {
        Self { storage, session }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing every invalid field.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    /// Returns `AuthError::Storage` if the accounts cannot be read or saved.
    #[instrument(skip_all, fields(email = %form.email))]
    pub fn register(&self, form: &RegistrationForm) -> Result<Account, AuthError> {
        let valid = validation::validate_registration(form).map_err(AuthError::Validation)?;

        let mut accounts = self.load_accounts()?;
        if accounts
            .iter()
            .any(|a| a.email.matches_ignore_case(valid.email.as_str()))
        {
            return Err(AuthError::EmailTaken);
        }

        let account = Account {
            id: AccountId::generate(),
            document: valid.document,
            first_names: valid.first_names,
            last_names: valid.last_names,
            email: valid.email,
            password_hash: hash_password(form.password.expose_secret())?,
            created_at: Utc::now(),
        };

        accounts.push(account.clone());
        self.save_accounts(&accounts)?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Login with email and password, opening the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Storage` if the accounts cannot be read or the
    /// session cannot be written.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &SecretString) -> Result<AccountSummary, AuthError> {
        let accounts = self.load_accounts()?;
        let account = accounts
            .iter()
            .find(|a| a.email.matches_ignore_case(email))
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.expose_secret(), &account.password_hash)?;

        let summary = account.summary(Utc::now());
        self.session.login(&summary)?;

        info!(account_id = %account.id, "Login succeeded");
        Ok(summary)
    }

    /// Close the current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.logout()?;
        Ok(())
    }

    /// All registered accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored accounts cannot be read.
    pub fn accounts(&self) -> Result<Vec<Account>, AuthError> {
        self.load_accounts()
    }

    fn load_accounts(&self) -> Result<Vec<Account>, AuthError> {
        let Some(raw) = self.storage.read(keys::ACCOUNTS)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|source| {
            warn!(error = %source, "Stored accounts are unreadable");
            AuthError::Storage(StorageError::Corrupt {
                path: keys::ACCOUNTS.into(),
                source,
            })
        })
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<(), AuthError> {
        let json = serde_json::to_string(accounts).map_err(StorageError::Serialize)?;
        self.storage.write(keys::ACCOUNTS, &json)?;
        Ok(())
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service() -> (Arc<MemoryStorage>, AccountService) {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::new(storage.clone());
        let service = AccountService::new(storage.clone(), session);
        (storage, service)
    }

    fn form(email: &str) -> RegistrationForm {
        RegistrationForm {
            document: "87654321".to_string(),
            first_names: "Lucía".to_string(),
            last_names: "Gómez".to_string(),
            email: email.to_string(),
            password: SecretString::from("Clave$egura9".to_string()),
        }
    }

    fn password(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("Clave$egura9").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Clave$egura9", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_password("x", "not a hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_persists_hashed_account() {
        let (storage, service) = service();
        let account = service.register(&form("lucia@example.com")).unwrap();

        let raw = storage.read(keys::ACCOUNTS).unwrap().unwrap();
        assert!(!raw.contains("Clave$egura9"));
        assert!(raw.contains("lucia@example.com"));

        let accounts = service.accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, account.id);
    }

    #[test]
    fn test_register_rejects_invalid_form() {
        let (storage, service) = service();
        let mut bad = form("lucia@example.com");
        bad.document = "12".to_string();
        bad.password = password("short");

        let err = service.register(&bad).unwrap_err();
        let AuthError::Validation(errors) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.has(Field::Document));
        assert!(errors.has(Field::Password));
        assert!(err.is_user_error());
        assert!(storage.read(keys::ACCOUNTS).unwrap().is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_email_case_insensitive() {
        let (_, service) = service();
        service.register(&form("lucia@example.com")).unwrap();
        assert!(matches!(
            service.register(&form("LUCIA@Example.com")),
            Err(AuthError::EmailTaken)
        ));
        assert_eq!(service.accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_login_opens_session() {
        let (_, service) = service();
        let account = service.register(&form("lucia@example.com")).unwrap();

        let summary = service
            .login("Lucia@Example.com", &password("Clave$egura9"))
            .unwrap();
        assert_eq!(summary.id, account.id);
        assert!(service.session.is_logged_in());
        assert_eq!(service.session.current().unwrap().id, account.id);

        service.logout().unwrap();
        assert!(!service.session.is_logged_in());
    }

    #[test]
    fn test_login_failures() {
        let (_, service) = service();
        service.register(&form("lucia@example.com")).unwrap();

        assert!(matches!(
            service.login("lucia@example.com", &password("Wrong$pass1")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody@example.com", &password("Clave$egura9")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(!service.session.is_logged_in());
    }

    #[test]
    fn test_corrupt_accounts_is_storage_error() {
        let (storage, service) = service();
        storage.write(keys::ACCOUNTS, "{oops").unwrap();
        let err = service.register(&form("lucia@example.com")).unwrap_err();
        assert!(matches!(err, AuthError::Storage(StorageError::Corrupt { .. })));
        assert!(!err.is_user_error());
    }
}
