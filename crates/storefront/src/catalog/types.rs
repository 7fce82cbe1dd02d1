//! Catalog domain types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Characters of description shown on a product card.
const SHORT_DESCRIPTION_CHARS: usize = 60;

/// Maximum star rating.
pub const MAX_STARS: u8 = 5;

/// A browsable product category, searched by its term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Search term sent to the product API.
    pub term: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// Technology categories offered by the store.
pub const CATEGORIES: [Category; 5] = [
    Category {
        term: "phone",
        name: "Smartphones",
    },
    Category {
        term: "laptop",
        name: "Laptops",
    },
    Category {
        term: "monitor",
        name: "Monitores",
    },
    Category {
        term: "tablet",
        name: "Tablets",
    },
    Category {
        term: "camera",
        name: "Cámaras",
    },
];

/// Term searched when none is given.
pub const DEFAULT_TERM: &str = "phone";

impl Category {
    /// Look up a category by term (case-insensitive).
    #[must_use]
    pub fn find(term: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .copied()
            .find(|c| c.term.eq_ignore_ascii_case(term.trim()))
    }
}

/// A product returned by the product API.
///
/// Fields the store does not interpret are kept in `extra` so the product
/// can be handed to the cart unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Whether the product can be listed: it needs a thumbnail and a
    /// description.
    #[must_use]
    pub fn is_listable(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.thumbnail) && present(&self.description)
    }

    /// Description cut to 60 characters, with `...` appended when cut.
    #[must_use]
    pub fn short_description(&self) -> String {
        let description = self.description.as_deref().unwrap_or_default();
        if description.chars().count() > SHORT_DESCRIPTION_CHARS {
            let cut: String = description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
            format!("{cut}...")
        } else {
            description.to_string()
        }
    }

    /// Whether the product is on sale.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0.0
    }

    /// Discount rounded to a whole percentage, for the sale badge.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn discount_badge(&self) -> Option<i64> {
        self.has_discount()
            .then(|| self.discount_percentage.round() as i64)
    }

    /// Price before the discount, rounded to a whole amount.
    ///
    /// `None` when there is no discount or the discount is 100% or more.
    #[must_use]
    pub fn original_price(&self) -> Option<Decimal> {
        if !self.has_discount() || self.discount_percentage >= 100.0 {
            return None;
        }
        let discount = Decimal::try_from(self.discount_percentage).ok()?;
        let remaining = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
        let original = self.price.checked_div(remaining)?;
        Some(original.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Rating rounded to whole stars, at most five.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stars(&self) -> u8 {
        if !self.rating.is_finite() || self.rating <= 0.0 {
            return 0;
        }
        self.rating.round().min(f64::from(MAX_STARS)) as u8
    }

    /// Five-character star bar, filled stars first.
    #[must_use]
    pub fn star_bar(&self) -> String {
        let filled = usize::from(self.stars());
        let empty = usize::from(MAX_STARS) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }

    /// The product as the JSON value the cart accepts.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be serialized.
    pub fn to_cart_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Response body of the product search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(value: Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    fn iphone() -> Product {
        product(json!({
            "id": 1,
            "title": "iPhone 9",
            "description": "An apple mobile which is nothing like apple",
            "price": 549,
            "discountPercentage": 12.96,
            "rating": 4.69,
            "stock": 94,
            "brand": "Apple",
            "category": "smartphones",
            "thumbnail": "https://cdn.dummyjson.com/1/thumbnail.jpg",
            "images": ["https://cdn.dummyjson.com/1/1.jpg"]
        }))
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(Category::find("Laptop").unwrap().name, "Laptops");
        assert_eq!(Category::find(" camera ").unwrap().name, "Cámaras");
        assert!(Category::find("fridge").is_none());
        assert!(Category::find(DEFAULT_TERM).is_some());
    }

    #[test]
    fn test_listable_requires_thumbnail_and_description() {
        assert!(iphone().is_listable());
        assert!(!product(json!({"id": 2, "description": "x"})).is_listable());
        assert!(!product(json!({"id": 3, "thumbnail": "t.jpg"})).is_listable());
        assert!(!product(json!({"id": 4, "thumbnail": "", "description": "x"})).is_listable());
    }

    #[test]
    fn test_short_description() {
        let mut p = iphone();
        assert_eq!(p.short_description(), "An apple mobile which is nothing like apple");

        p.description = Some("á".repeat(61));
        let short = p.short_description();
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 63);

        p.description = Some("b".repeat(60));
        assert_eq!(p.short_description(), "b".repeat(60));
    }

    #[test]
    fn test_original_price_and_badge() {
        let p = iphone();
        // 549 / 0.8704 = 630.74...
        assert_eq!(p.original_price(), Some(Decimal::from(631)));
        assert_eq!(p.discount_badge(), Some(13));

        let full_price = product(json!({"id": 5, "price": 10}));
        assert_eq!(full_price.original_price(), None);
        assert_eq!(full_price.discount_badge(), None);
    }

    #[test]
    fn test_stars() {
        assert_eq!(iphone().stars(), 5);
        assert_eq!(iphone().star_bar(), "★★★★★");

        let p = product(json!({"id": 6, "rating": 3.4}));
        assert_eq!(p.stars(), 3);
        assert_eq!(p.star_bar(), "★★★☆☆");
        assert_eq!(product(json!({"id": 7})).stars(), 0);
        assert_eq!(product(json!({"id": 8, "rating": 9.0})).stars(), 5);
    }

    #[test]
    fn test_cart_value_keeps_unknown_fields() {
        let value = iphone().to_cart_value().unwrap();
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["title"], json!("iPhone 9"));
        assert_eq!(value["thumbnail"], json!("https://cdn.dummyjson.com/1/thumbnail.jpg"));
        assert_eq!(value["images"][0], json!("https://cdn.dummyjson.com/1/1.jpg"));
    }
}
