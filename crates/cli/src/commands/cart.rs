//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! techstore cart add '{"id": "p1", "title": "Cable", "price": 10}'
//! techstore cart set p1 3
//! techstore cart remove p1
//! techstore cart show
//! techstore cart clear
//! ```

use std::fmt::Write as _;
use std::str::FromStr;

use techstore_core::{ProductId, format_amount};
use techstore_storefront::cart::{CartSnapshot, LineItem};
use techstore_storefront::error::add_breadcrumb;
use techstore_storefront::state::AppState;

use super::CommandError;

/// Print the cart.
pub fn show(state: &AppState) {
    print!("{}", render(&state.cart().snapshot()));
}

/// Add one unit of a product given as JSON.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the product is rejected.
pub fn add(state: &AppState, product_json: &str) -> Result<(), CommandError> {
    let product: serde_json::Value = serde_json::from_str(product_json)
        .map_err(|e| CommandError::InvalidArgument(format!("product JSON: {e}")))?;

    let snapshot = state.cart().add_item(&product)?;
    add_breadcrumb("cart", "Added product", None);
    println!("{}", summary(&snapshot));
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if the id is empty.
pub fn remove(state: &AppState, raw_id: &str) -> Result<(), CommandError> {
    let id = resolve_id(&state.cart().items(), raw_id)?;
    let snapshot = state.cart().remove_item(&id);
    println!("{}", summary(&snapshot));
    Ok(())
}

/// Set a product's quantity; zero or non-numeric quantities remove it.
///
/// # Errors
///
/// Returns an error if the id is empty.
pub fn set(state: &AppState, raw_id: &str, quantity: String) -> Result<(), CommandError> {
    let id = resolve_id(&state.cart().items(), raw_id)?;
    let snapshot = state.cart().set_quantity(&id, quantity);
    println!("{}", summary(&snapshot));
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &AppState) {
    let snapshot = state.cart().clear();
    println!("{}", summary(&snapshot));
}

/// Match a command-line id against the cart.
///
/// Numeric input names a numeric id unless only a text id with the same
/// spelling is in the cart.
fn resolve_id(items: &[LineItem], raw: &str) -> Result<ProductId, CommandError> {
    let raw = raw.trim();
    let parsed = ProductId::from_str(raw)
        .map_err(|_| CommandError::InvalidArgument("product id must not be empty".to_string()))?;

    let as_text = ProductId::from(raw);
    if !items.iter().any(|item| item.id == parsed) && items.iter().any(|item| item.id == as_text) {
        return Ok(as_text);
    }
    Ok(parsed)
}

/// One-line cart summary.
fn summary(snapshot: &CartSnapshot) -> String {
    format!(
        "{} item(s), total {}",
        snapshot.item_count(),
        format_amount(snapshot.total())
    )
}

/// Cart table followed by the summary line.
fn render(snapshot: &CartSnapshot) -> String {
    if snapshot.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in &snapshot.items {
        let _ = writeln!(
            out,
            "{:<8} {:<32} {:>4} x {:>10} = {:>10}",
            item.id.to_string(),
            item.title().unwrap_or("-"),
            item.quantity,
            item.price.display(),
            format_amount(item.line_total()),
        );
    }
    let _ = writeln!(out, "{}", summary(snapshot));
    out
}
