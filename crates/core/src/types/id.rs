//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! Products are the exception: the demo APIs hand out integer ids while
//! products added from other sources may carry string ids, so [`ProductId`]
//! is an enum over both.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use techstore_core::define_id;
/// define_id!(UserId);
/// define_id!(CategoryId);
///
/// let user_id = UserId::new(1);
/// let category_id = CategoryId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = category_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Remote entities of the demo administration API
define_id!(UserId);
define_id!(CategoryId);

/// Identifier of a product, as carried by a cart line item.
///
/// Equality is strict: `ProductId::Number(1)` and `ProductId::Text("1")` are
/// different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Integer id, as handed out by the product APIs.
    Number(i64),
    /// Free-form string id.
    Text(String),
}

impl ProductId {
    /// Extract a usable product id from a JSON value.
    ///
    /// Returns `None` for values that cannot identify a product: `null`,
    /// `0`, the empty string, non-integral numbers, booleans, arrays and
    /// objects.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                let id = n.as_i64().or_else(|| n.as_f64().and_then(integral_f64))?;
                (id != 0).then_some(Self::Number(id))
            }
            serde_json::Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

/// `1.0` is the same product as `1`; anything fractional is not an id.
#[allow(clippy::cast_possible_truncation)] // range checked before the cast
fn integral_f64(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < 9.0e15).then(|| f as i64)
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Parses command-line input: anything that reads as an integer becomes
/// [`ProductId::Number`], everything else [`ProductId::Text`].
impl std::str::FromStr for ProductId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("product id cannot be empty".to_string());
        }
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
    }
}

/// Identifier of a locally registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random account id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_integers_and_strings() {
        assert_eq!(ProductId::from_json(&json!(7)), Some(ProductId::Number(7)));
        assert_eq!(ProductId::from_json(&json!(7.0)), Some(ProductId::Number(7)));
        assert_eq!(
            ProductId::from_json(&json!("p1")),
            Some(ProductId::Text("p1".to_string()))
        );
    }

    #[test]
    fn test_from_json_rejects_unusable_ids() {
        assert_eq!(ProductId::from_json(&json!(null)), None);
        assert_eq!(ProductId::from_json(&json!(0)), None);
        assert_eq!(ProductId::from_json(&json!("")), None);
        assert_eq!(ProductId::from_json(&json!(1.5)), None);
        assert_eq!(ProductId::from_json(&json!(true)), None);
        assert_eq!(ProductId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn test_number_and_text_are_distinct() {
        assert_ne!(ProductId::Number(1), ProductId::Text("1".to_string()));
    }

    #[test]
    fn test_serde_untagged() {
        assert_eq!(serde_json::to_string(&ProductId::Number(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ProductId::from("abc")).unwrap(),
            "\"abc\""
        );
        let parsed: ProductId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed, ProductId::from("abc"));
        let parsed: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, ProductId::Number(42));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("12".parse::<ProductId>().unwrap(), ProductId::Number(12));
        assert_eq!(
            "sku-12".parse::<ProductId>().unwrap(),
            ProductId::from("sku-12")
        );
        assert!("  ".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_define_id_display() {
        let id = UserId::new(5);
        assert_eq!(id.to_string(), "5");
        assert_eq!(i64::from(id), 5);
    }
}
