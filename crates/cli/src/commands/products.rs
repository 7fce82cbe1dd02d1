//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! techstore products categories
//! techstore products search laptop
//! techstore products add 78 laptop
//! ```

use std::fmt::Write as _;

use techstore_core::format_amount;
use techstore_storefront::catalog::{DEFAULT_TERM, Product};
use techstore_storefront::error::add_breadcrumb;
use techstore_storefront::state::AppState;

use super::CommandError;

/// List the categories.
pub fn categories(state: &AppState) {
    for category in state.catalog().categories() {
        println!("{:<8} {}", category.term, category.name);
    }
}

/// Search and list products.
///
/// # Errors
///
/// Returns an error if the product API request fails.
pub async fn search(state: &AppState, term: &str) -> Result<(), CommandError> {
    let products = state.catalog().search(term).await?;
    if products.is_empty() {
        println!("No products available in this category");
        return Ok(());
    }
    for product in &products {
        print!("{}", render(product));
    }
    Ok(())
}

/// Add a listed product to the cart.
///
/// # Errors
///
/// Returns an error if the search fails, the product is not listed under
/// `term`, or the cart rejects it.
pub async fn add(state: &AppState, id: i64, term: &str) -> Result<(), CommandError> {
    let term = if term.trim().is_empty() { DEFAULT_TERM } else { term };
    let product = state
        .catalog()
        .find(term, id)
        .await?
        .ok_or_else(|| CommandError::NotFound(format!("product {id} in '{term}'")))?;

    let value = product
        .to_cart_value()
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    let snapshot = state.cart().add_item(&value)?;
    add_breadcrumb("cart", "Added product", Some(&[("product_id", &id.to_string())]));

    println!(
        "{} added to cart ({} item(s), total {})",
        product.title,
        snapshot.item_count(),
        format_amount(snapshot.total())
    );
    Ok(())
}

/// Product card as text.
fn render(product: &Product) -> String {
    let mut out = String::new();

    let badge = product
        .discount_badge()
        .map(|d| format!(" [-{d}%]"))
        .unwrap_or_default();
    let _ = writeln!(out, "#{} {}{}", product.id, product.title, badge);

    if let Some(brand) = &product.brand {
        let _ = writeln!(out, "    {brand}");
    }
    let _ = writeln!(out, "    {}", product.short_description());

    let original = product
        .original_price()
        .map(|p| format!(" (was {})", format_amount(p)))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "    {}{}  {} {}/5  {} in stock",
        format_amount(product.price),
        original,
        product.star_bar(),
        product.rating,
        product.stock
    );
    out
}
