//! Registration form validation.
//!
//! Every field is checked and every failure is reported, so a caller can
//! show all problems with a form at once.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;

use techstore_core::Email;

use crate::models::RegistrationForm;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols accepted as the "special character" of a password.
const PASSWORD_SYMBOLS: &str = r#"!@#$%^&*()_-+=[]{};':"\|,.<>/?"#;

/// Identity document: 8 to 11 digits.
static DOCUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8,11}$").expect("Invalid regex"));

/// Names: 1 to 35 letters (including Spanish accents) and spaces.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]{1,35}$").expect("Invalid regex")
});

/// Registration form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Document,
    FirstNames,
    LastNames,
    Email,
    Password,
}

impl Field {
    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::FirstNames => "first_names",
            Self::LastNames => "last_names",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All failed checks of a registration form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Failed checks.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` failed.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// A registration form that passed validation.
#[derive(Debug)]
pub struct ValidRegistration {
    pub document: String,
    pub first_names: String,
    pub last_names: String,
    pub email: Email,
}

/// Validate a registration form.
///
/// # Errors
///
/// Returns every failing field check.
pub fn validate_registration(
    form: &RegistrationForm,
) -> Result<ValidRegistration, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !DOCUMENT_RE.is_match(&form.document) {
        errors.push(Field::Document, "must be 8 to 11 digits");
    }
    if !NAME_RE.is_match(&form.first_names) {
        errors.push(
            Field::FirstNames,
            "only letters and spaces, at most 35 characters",
        );
    }
    if !NAME_RE.is_match(&form.last_names) {
        errors.push(
            Field::LastNames,
            "only letters and spaces, at most 35 characters",
        );
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(Field::Email, e.to_string());
            None
        }
    };

    if let Err(message) = validate_password(form.password.expose_secret()) {
        errors.push(Field::Password, message);
    }

    match email {
        Some(email) if errors.is_empty() => Ok(ValidRegistration {
            document: form.document.clone(),
            first_names: form.first_names.clone(),
            last_names: form.last_names.clone(),
            email,
        }),
        _ => Err(errors),
    }
}

/// Check password strength.
///
/// # Errors
///
/// Returns a message listing the unmet requirements.
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut missing = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit");
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        missing.push("a symbol");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("password needs {}", missing.join(", ")))
    }
}
