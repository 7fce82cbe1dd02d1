//! Back-office commands.
//!
//! # Usage
//!
//! ```bash
//! techstore admin users --search maria --page 2
//! techstore admin products --search shirt
//! techstore admin create-product --title Mouse --price 15 --description "Wireless mouse"
//! techstore admin update-product 42 --price 12.5
//! techstore admin delete-product 42
//! ```
//!
//! # Environment Variables
//!
//! - `TECHSTORE_ADMIN_API_URL` - Base URL of the admin REST API
//! - `TECHSTORE_ADMIN_API_TOKEN` - Bearer token (optional)

use std::str::FromStr;

use clap::Args;
use rust_decimal::Decimal;

use techstore_admin::api::{AdminProduct, AdminUser, ProductDraft};
use techstore_admin::config::AdminConfig;
use techstore_admin::{AdminClient, Page, filter_and_paginate};
use techstore_core::{CategoryId, ProductId, format_amount};

use super::CommandError;

/// Product fields accepted by create and update.
#[derive(Debug, Args)]
pub struct ProductFields {
    /// Product title
    #[arg(long)]
    pub title: Option<String>,

    /// Unit price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Category id (default: 1)
    #[arg(long)]
    pub category: Option<i64>,

    /// Image URL (default: placeholder image)
    #[arg(long)]
    pub image: Option<String>,
}

impl ProductFields {
    /// Apply the given fields over `draft`.
    fn apply(self, mut draft: ProductDraft) -> ProductDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(category) = self.category {
            draft = draft.with_category(CategoryId::new(category));
        }
        if let Some(image) = self.image {
            draft = draft.with_image(image);
        }
        draft
    }
}

/// Create a client from environment configuration.
///
/// # Errors
///
/// Returns an error if the admin configuration is invalid.
pub fn client() -> Result<AdminClient, CommandError> {
    let config = AdminConfig::from_env()?;
    Ok(AdminClient::new(&config))
}

/// List one page of users.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn users(client: &AdminClient, search: &str, page: usize) -> Result<(), CommandError> {
    let users = client.list_users().await?;
    let page = filter_and_paginate(&users, search, page);
    if page.items.is_empty() {
        println!("No users found");
    }
    for user in &page.items {
        println!("{}", user_row(user));
    }
    println!("{}", footer(&page));
    Ok(())
}

/// List one page of products.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn products(client: &AdminClient, search: &str, page: usize) -> Result<(), CommandError> {
    let products = client.list_products().await?;
    let page = filter_and_paginate(&products, search, page);
    if page.items.is_empty() {
        println!("No products found");
    }
    for product in &page.items {
        println!("{}", product_row(product));
    }
    println!("{}", footer(&page));
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error if a required field is missing, the draft is invalid or
/// the API request fails.
pub async fn create_product(
    client: &AdminClient,
    fields: ProductFields,
) -> Result<(), CommandError> {
    let title = fields.title.clone().unwrap_or_default();
    let description = fields.description.clone().unwrap_or_default();
    let price = fields
        .price
        .ok_or_else(|| CommandError::InvalidArgument("--price is required".to_string()))?;

    let draft = fields.apply(ProductDraft::new(title, price, description));
    let product = client.create_product(&draft).await?;
    println!("Created {}", product_row(&product));
    Ok(())
}

/// Update a product; fields not given keep their current value.
///
/// # Errors
///
/// Returns an error if the product does not exist, the draft is invalid or
/// the API request fails.
pub async fn update_product(
    client: &AdminClient,
    id: &str,
    fields: ProductFields,
) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    let current = client.get_product(&id).await?;
    let draft = fields.apply(ProductDraft::from_product(&current));
    let product = client.update_product(&id, &draft).await?;
    println!("Updated {}", product_row(&product));
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the API request fails.
pub async fn delete_product(client: &AdminClient, id: &str) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    client.delete_product(&id).await?;
    println!("Deleted product {id}");
    Ok(())
}

fn parse_id(raw: &str) -> Result<ProductId, CommandError> {
    ProductId::from_str(raw.trim())
        .map_err(|_| CommandError::InvalidArgument("product id must not be empty".to_string()))
}

fn user_row(user: &AdminUser) -> String {
    format!(
        "{:<6} {:<24} {:<32} {}",
        user.id, user.name, user.email, user.role
    )
}

fn product_row(product: &AdminProduct) -> String {
    let category = product
        .category
        .as_ref()
        .map_or("-", |c| c.name.as_str());
    format!(
        "{:<6} {:<40} {:>10}  {}",
        product.id.to_string(),
        product.title,
        format_amount(product.price),
        category
    )
}

fn footer<T>(page: &Page<T>) -> String {
    format!(
        "Page {} of {} ({} match(es))",
        page.page,
        page.total_pages.max(1),
        page.total_items
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use techstore_admin::api::{DEFAULT_CATEGORY, PLACEHOLDER_IMAGE};

    fn no_fields() -> ProductFields {
        ProductFields {
            title: None,
            price: None,
            description: None,
            category: None,
            image: None,
        }
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let draft = ProductDraft::new("Mouse", Decimal::from(15), "Wireless");
        let updated = ProductFields {
            price: Some(Decimal::from(12)),
            ..no_fields()
        }
        .apply(draft);

        assert_eq!(updated.title, "Mouse");
        assert_eq!(updated.price, Decimal::from(12));
        assert_eq!(updated.category_id, DEFAULT_CATEGORY);
        assert_eq!(updated.images, vec![PLACEHOLDER_IMAGE.to_string()]);
    }

    #[test]
    fn test_apply_category_and_image() {
        let draft = ProductFields {
            category: Some(4),
            image: Some("https://img.example.com/x.png".to_string()),
            ..no_fields()
        }
        .apply(ProductDraft::new("Mouse", Decimal::from(15), "Wireless"));

        assert_eq!(draft.category_id, CategoryId::new(4));
        assert_eq!(draft.images, vec!["https://img.example.com/x.png".to_string()]);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 42 ").unwrap(), ProductId::Number(42));
        assert!(parse_id("").is_err());
    }

    #[test]
    fn test_footer_for_empty_table() {
        let page: Page<AdminUser> = filter_and_paginate(&[], "", 1);
        assert_eq!(footer(&page), "Page 1 of 1 (0 match(es))");
    }
}
