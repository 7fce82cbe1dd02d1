//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! techstore account register --document 12345678 --first-names Ana \
//!     --last-names Pérez -e ana@example.com -p 'Secreto#1'
//! techstore account login -e ana@example.com -p 'Secreto#1'
//! techstore account whoami
//! techstore account logout
//! ```

use secrecy::SecretString;

use techstore_storefront::models::RegistrationForm;
use techstore_storefront::services::auth::AuthError;
use techstore_storefront::state::AppState;

use super::CommandError;

/// Register a new account.
///
/// # Errors
///
/// Returns an error listing every invalid field, if the email is taken, or
/// if the account cannot be stored.
pub fn register(state: &AppState, form: RegistrationForm) -> Result<(), CommandError> {
    match state.accounts().register(&form) {
        Ok(account) => {
            println!("Welcome, {}", account.first_names);
            Ok(())
        }
        Err(AuthError::Validation(errors)) => {
            for error in errors.errors() {
                println!("{}: {}", error.field, error.message);
            }
            Err(AuthError::Validation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Log in and print where to continue.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the session cannot be
/// stored.
pub fn login(state: &AppState, email: &str, password: &SecretString) -> Result<(), CommandError> {
    let account = state.accounts().login(email, password)?;
    println!("Hello, {}", account.first_names);
    println!("Continue at {}", state.session().take_return_path());
    Ok(())
}

/// Log out.
///
/// # Errors
///
/// Returns an error if the session cannot be removed.
pub fn logout(state: &AppState) -> Result<(), CommandError> {
    state.accounts().logout()?;
    println!("Logged out");
    Ok(())
}

/// Print the logged-in account.
pub fn whoami(state: &AppState) {
    match state.session().current() {
        Some(account) => println!(
            "{} {} <{}>",
            account.first_names, account.last_names, account.email
        ),
        None if state.session().is_logged_in() => println!("Logged in (session unreadable)"),
        None => println!("Not logged in"),
    }
}
