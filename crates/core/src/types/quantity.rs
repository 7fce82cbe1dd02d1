//! Line item quantities and the coercion rule for requested quantities.
//!
//! Quantity changes come from form fields and +/- buttons, so a requested
//! quantity may be a number or a piece of text. [`RequestedQuantity::coerce`]
//! turns it into a [`Quantity`], or `None` when the request means "remove
//! this line".

use core::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A line item quantity. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// One more unit, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Sum of two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("quantity must be at least 1")
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

/// A quantity as requested by a caller, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestedQuantity {
    /// A numeric request (e.g., `current - 1` from a decrement button).
    Number(f64),
    /// A textual request (e.g., the raw value of a quantity input).
    Text(String),
}

impl RequestedQuantity {
    /// Coerce the request into a quantity.
    ///
    /// Text is trimmed; empty text means zero. Otherwise the value is read as
    /// a decimal number (exponents allowed). Fractional values are floored
    /// and values above `u32::MAX` saturate.
    ///
    /// Returns `None` when the request is not a valid positive number:
    /// unparsable text, `NaN`, infinities, and anything below 1 after
    /// flooring. Callers treat `None` as a removal.
    #[must_use]
    pub fn coerce(&self) -> Option<Quantity> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().ok()?
                }
            }
        };

        if !value.is_finite() {
            return None;
        }

        let floored = value.floor();
        if floored < 1.0 {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range
        let units = floored.min(f64::from(u32::MAX)) as u32;
        Quantity::new(units)
    }
}

impl From<f64> for RequestedQuantity {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RequestedQuantity {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for RequestedQuantity {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for RequestedQuantity {
    #[allow(clippy::cast_precision_loss)] // quantities never approach 2^53
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for RequestedQuantity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RequestedQuantity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// JSON values follow the same rules as form input: `null` and `false` read
/// as zero, `true` as one, arrays and objects are never a quantity.
impl From<&serde_json::Value> for RequestedQuantity {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Number(0.0),
            serde_json::Value::Bool(b) => Self::Number(if *b { 1.0 } else { 0.0 }),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Number(f64::NAN),
        }
    }
}
