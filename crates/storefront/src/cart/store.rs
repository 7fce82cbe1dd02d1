//! The cart store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use techstore_core::{ProductId, RequestedQuantity};

use super::CartError;
use super::line_item::{LineItem, PersistedLineItem, hydrate};
use crate::error::report_error;
use crate::storage::{Storage, keys};

/// An immutable view of the cart at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    /// Number of mutations applied since the store was opened.
    pub revision: u64,
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
}

impl CartSnapshot {
    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        item_count(&self.items)
    }

    /// Sum of `price * quantity` over all items.
    #[must_use]
    pub fn total(&self) -> Decimal {
        total(&self.items)
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn item_count(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity.get())).sum()
}

/// Saturates at [`Decimal::MAX`].
fn total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(LineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Process-wide cart store.
///
/// Cheap to clone; all clones share the same state, storage and
/// subscribers.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn Storage>,
    key: String,
    state: Mutex<CartSnapshot>,
    updates: watch::Sender<CartSnapshot>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("storage", &self.inner.storage)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart persisted under the default `cart` key.
    ///
    /// Never fails: a missing, unreadable or corrupt snapshot is logged and
    /// the cart starts empty.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        Self::open_with_key(storage, keys::CART)
    }

    /// Open the cart persisted under `key`.
    #[must_use]
    pub fn open_with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = load_items(storage.as_ref(), &key);
        let snapshot = CartSnapshot { revision: 0, items };
        let (updates, _) = watch::channel(snapshot.clone());

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key,
                state: Mutex::new(snapshot),
                updates,
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product` to the cart.
    ///
    /// A product already in the cart has its quantity incremented; a new
    /// product is appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInput`] if `product` is not an object,
    /// lacks a usable `id`, or has an invalid `price`. The cart is left
    /// untouched in that case.
    pub fn add_item(&self, product: &Value) -> Result<CartSnapshot, CartError> {
        let line = LineItem::from_product(product).inspect_err(|e| {
            warn!(error = %e, "Rejected product for cart");
        })?;

        Ok(self.mutate("add_item", |items| {
            if let Some(existing) = items.iter_mut().find(|item| item.id == line.id) {
                existing.quantity = existing.quantity.incremented();
            } else {
                items.push(line);
            }
        }))
    }

    /// Remove the line with `id`. Removing an absent id is a no-op.
    pub fn remove_item(&self, id: &ProductId) -> CartSnapshot {
        self.mutate("remove_item", |items| remove(items, id))
    }

    /// Set the quantity of the line with `id`.
    ///
    /// The request is coerced with [`RequestedQuantity::coerce`]; anything
    /// that is not a valid positive number removes the line instead.
    /// Fractions are floored, so a request between 0 and 1 (e.g. `0.5`)
    /// removes the line too.
    pub fn set_quantity(
        &self,
        id: &ProductId,
        requested: impl Into<RequestedQuantity>,
    ) -> CartSnapshot {
        match requested.into().coerce() {
            Some(quantity) => self.mutate("set_quantity", |items| {
                if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
                    item.quantity = quantity;
                }
            }),
            None => self.mutate("set_quantity", |items| remove(items, id)),
        }
    }

    /// Empty the cart.
    pub fn clear(&self) -> CartSnapshot {
        self.mutate("clear", Vec::clear)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the current line items.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.lock().items.clone()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        item_count(&self.lock().items)
    }

    /// Sum of `price * quantity` over all items.
    #[must_use]
    pub fn total(&self) -> Decimal {
        total(&self.lock().items)
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver holds the latest snapshot and is marked changed after
    /// every mutation, before the mutating call returns. Do not hold a
    /// borrow of the receiver while calling into the store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.updates.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, CartSnapshot> {
        // Mutations never panic while holding the lock; a poisoned state is
        // still consistent
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change`, write the result through to storage and notify
    /// subscribers, all under the state lock.
    fn mutate(
        &self,
        operation: &'static str,
        change: impl FnOnce(&mut Vec<LineItem>),
    ) -> CartSnapshot {
        let mut state = self.lock();
        change(&mut state.items);
        state.revision += 1;

        self.persist(&state.items);

        let snapshot = state.clone();
        self.inner.updates.send_replace(snapshot.clone());

        debug!(
            operation,
            revision = snapshot.revision,
            lines = snapshot.items.len(),
            "Cart updated"
        );
        snapshot
    }

    fn persist(&self, items: &[LineItem]) {
        let result = serde_json::to_string(items)
            .map_err(crate::storage::StorageError::from)
            .and_then(|payload| self.inner.storage.write(&self.inner.key, &payload));

        if let Err(e) = result {
            report_error(&e, "Failed to persist cart; change kept in memory only");
        }
    }
}

fn remove(items: &mut Vec<LineItem>, id: &ProductId) {
    items.retain(|item| &item.id != id);
}

/// Read and repair the persisted cart. Any failure yields an empty cart.
fn load_items(storage: &dyn Storage, key: &str) -> Vec<LineItem> {
    let payload = match storage.read(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, key, "Failed to read persisted cart; starting empty");
            return Vec::new();
        }
    };

    let persisted: Vec<PersistedLineItem> = match serde_json::from_str(&payload) {
        Ok(persisted) => persisted,
        Err(e) => {
            warn!(error = %e, key, "Discarding corrupt cart snapshot");
            return Vec::new();
        }
    };

    let (items, report) = hydrate(persisted);
    if !report.is_clean() {
        warn!(
            key,
            dropped_empty = report.dropped_empty,
            merged_duplicates = report.merged_duplicates,
            "Repaired persisted cart"
        );
    }
    items
}
