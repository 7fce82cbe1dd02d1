//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the product APIs as JSON numbers (sometimes as numeric
//! strings from form fields). They are held as [`Decimal`] so that cart
//! totals never accumulate floating-point error.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Quantity;

/// Errors that can occur when reading a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The value is not a number or numeric string.
    #[error("price must be numeric (got {0})")]
    NotNumeric(String),
}

/// A non-negative unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero price, used when a product carries no price at all.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Read a price from a JSON value.
    ///
    /// `null` reads as [`Price::ZERO`]; numbers and numeric strings
    /// (including scientific notation) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotNumeric`] for booleans, arrays, objects and
    /// strings that do not hold a number, and [`PriceError::Negative`] for
    /// amounts below zero.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PriceError> {
        match value {
            serde_json::Value::Null => Ok(Self::ZERO),
            serde_json::Value::Number(n) => Self::new(parse_decimal(&n.to_string())?),
            serde_json::Value::String(s) => Self::new(parse_decimal(s)?),
            other => Err(PriceError::NotNumeric(other.to_string())),
        }
    }

    /// Get the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self, quantity: Quantity) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity.get()))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.0)
    }
}

/// Format any decimal amount the way prices are shown (e.g., "$19.99").
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn parse_decimal(s: &str) -> Result<Decimal, PriceError> {
    let trimmed = s.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| PriceError::NotNumeric(s.to_owned()))
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_decimal(s)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_total_saturates() {
        let price = Price::from_json(&json!("1e20")).unwrap();
        let quantity = Quantity::new(u32::MAX).unwrap();
        assert_eq!(price.line_total(quantity), Decimal::MAX);

        let price = Price::from_json(&json!("2.50")).unwrap();
        assert_eq!(
            price.line_total(Quantity::new(4).unwrap()),
            Decimal::from(10)
        );
    }

    #[test]
    fn test_from_json_number() {
        let price = Price::from_json(&json!(9.99)).unwrap();
        assert_eq!(price.amount(), Decimal::new(999, 2));
    }

    #[test]
    fn test_from_json_integer_and_string() {
        assert_eq!(Price::from_json(&json!(10)).unwrap().amount(), Decimal::TEN);
        assert_eq!(
            Price::from_json(&json!(" 12.50 ")).unwrap().amount(),
            Decimal::new(1250, 2)
        );
        assert_eq!(
            Price::from_json(&json!("1e2")).unwrap().amount(),
            Decimal::ONE_HUNDRED
        );
    }

    #[test]
    fn test_from_json_null_is_zero() {
        assert_eq!(Price::from_json(&json!(null)).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_from_json_rejects_negative() {
        assert!(matches!(
            Price::from_json(&json!(-1)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_non_numeric() {
        assert!(matches!(
            Price::from_json(&json!("abc")),
            Err(PriceError::NotNumeric(_))
        ));
        assert!(matches!(
            Price::from_json(&json!(true)),
            Err(PriceError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_line_total() {
        let price = Price::new(Decimal::new(250, 2)).unwrap();
        let quantity = Quantity::new(4).unwrap();
        assert_eq!(price.line_total(quantity), Decimal::TEN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(Decimal::new(1999, 2)).unwrap().display(), "$19.99");
        assert_eq!(Price::new(Decimal::TEN).unwrap().display(), "$10.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "$12.35");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-3\"").is_err());
        let price: Price = serde_json::from_str("\"3.50\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(350, 2));
    }
}
