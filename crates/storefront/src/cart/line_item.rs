//! Cart line items and their persisted form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use techstore_core::{Price, ProductId, Quantity};

use super::CartError;

/// Product fields that are owned by the line item itself and never copied
/// into its display details.
const RESERVED_FIELDS: [&str; 3] = ["id", "price", "quantity"];

/// One distinct product in the cart.
///
/// Display fields of the product (title, thumbnail, brand, ...) are copied
/// verbatim at add-time and flattened next to the line item fields when
/// serialized, so a persisted line item has the same shape as the product it
/// came from plus a `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Number of units, at least 1.
    pub quantity: Quantity,
    /// Unit price captured when the product was added.
    #[serde(default)]
    pub price: Price,
    /// Display fields copied from the product.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl LineItem {
    /// Build a single-unit line item from a product value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] if the product is not a JSON
    /// object, has no usable `id`, or carries a negative or non-numeric
    /// `price`.
    pub fn from_product(product: &Value) -> Result<Self, CartError> {
        let fields = product.as_object().ok_or_else(|| {
            CartError::InvalidInput(format!("product must be an object, got {product}"))
        })?;

        let id = fields
            .get("id")
            .and_then(ProductId::from_json)
            .ok_or_else(|| CartError::InvalidInput("product has no usable id".to_string()))?;

        let price = fields
            .get("price")
            .map_or(Ok(Price::ZERO), Price::from_json)
            .map_err(|e| CartError::InvalidInput(format!("product {id}: {e}")))?;

        let details = fields
            .iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            id,
            quantity: Quantity::ONE,
            price,
            details,
        })
    }

    /// Price of the whole line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.line_total(self.quantity)
    }

    /// Product title, if the product had one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.details.get("title").and_then(Value::as_str)
    }

    /// Product thumbnail URL, if the product had one.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.details.get("thumbnail").and_then(Value::as_str)
    }
}

/// A line item as found in storage.
///
/// More lenient than [`LineItem`]: a zero quantity is accepted here and
/// dropped by [`hydrate`].
#[derive(Debug, Deserialize)]
pub(crate) struct PersistedLineItem {
    id: ProductId,
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    price: Price,
    #[serde(flatten)]
    details: Map<String, Value>,
}

/// Outcome of restoring persisted line items.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct HydrateReport {
    pub dropped_empty: usize,
    pub merged_duplicates: usize,
}

impl HydrateReport {
    pub(crate) const fn is_clean(&self) -> bool {
        self.dropped_empty == 0 && self.merged_duplicates == 0
    }
}

/// Restore the cart invariants over persisted line items.
///
/// Lines with a zero quantity are dropped; lines repeating an id are merged
/// into the first occurrence by summing quantities.
pub(crate) fn hydrate(persisted: Vec<PersistedLineItem>) -> (Vec<LineItem>, HydrateReport) {
    let mut items: Vec<LineItem> = Vec::with_capacity(persisted.len());
    let mut report = HydrateReport::default();

    for raw in persisted {
        let Some(quantity) = Quantity::new(raw.quantity) else {
            report.dropped_empty += 1;
            continue;
        };

        if let Some(existing) = items.iter_mut().find(|item| item.id == raw.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            report.merged_duplicates += 1;
            continue;
        }

        items.push(LineItem {
            id: raw.id,
            quantity,
            price: raw.price,
            details: raw.details,
        });
    }

    (items, report)
}
