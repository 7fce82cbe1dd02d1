//! Admin API resource types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use techstore_core::{CategoryId, ProductId, UserId};

use crate::error::AdminError;
use crate::pagination::{Searchable, contains_ignore_case};

/// Image used when a product is created without one.
pub const PLACEHOLDER_IMAGE: &str = "https://placeimg.com/640/480/tech";

/// Category assigned when a product is created without one.
pub const DEFAULT_CATEGORY: CategoryId = CategoryId::new(1);

/// A user account of the admin API.
///
/// The API also returns the user's password; it is never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_at: Option<DateTime<Utc>>,
}

impl Searchable for AdminUser {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle) || contains_ignore_case(&self.email, needle)
    }
}

/// A product category of the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCategory {
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
}

/// A product of the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProduct {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AdminCategory>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_at: Option<DateTime<Utc>>,
}

impl AdminProduct {
    /// First image, used as the table thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

impl Searchable for AdminProduct {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.title, needle)
    }
}

/// Body of a product create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub category_id: CategoryId,
    pub images: Vec<String>,
}

impl ProductDraft {
    /// A draft in the default category with the placeholder image.
    #[must_use]
    pub fn new(title: impl Into<String>, price: Decimal, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price,
            description: description.into(),
            category_id: DEFAULT_CATEGORY,
            images: vec![PLACEHOLDER_IMAGE.to_string()],
        }
    }

    /// A draft pre-filled from an existing product, for editing.
    #[must_use]
    pub fn from_product(product: &AdminProduct) -> Self {
        let images = if product.images.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_string()]
        } else {
            product.images.clone()
        };

        Self {
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            category_id: product
                .category
                .as_ref()
                .map_or(DEFAULT_CATEGORY, |c| c.id),
            images,
        }
    }

    /// Set the category.
    #[must_use]
    pub const fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = category_id;
        self
    }

    /// Replace the images with a single image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images = vec![url.into()];
        self
    }

    /// Check the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidDraft` if the title or description is
    /// blank, the price is not positive, or there is no image.
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.title.trim().is_empty() {
            return Err(AdminError::InvalidDraft("title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AdminError::InvalidDraft(
                "description is required".to_string(),
            ));
        }
        if self.price <= Decimal::ZERO {
            return Err(AdminError::InvalidDraft(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        if self.images.iter().all(|url| url.trim().is_empty()) {
            return Err(AdminError::InvalidDraft(
                "at least one image is required".to_string(),
            ));
        }
        Ok(())
    }
}
