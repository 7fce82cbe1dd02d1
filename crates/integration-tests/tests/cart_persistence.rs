//! Cart persistence across restarts of a file-backed profile.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;

use techstore_core::ProductId;
use techstore_integration_tests::open_profile;
use techstore_storefront::storage::{FileStorage, Storage, keys};

// =============================================================================
// Restart Tests
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let state = open_profile(dir.path(), None).unwrap();
        let cart = state.cart();
        cart.add_item(&json!({"id": 1, "title": "Phone", "price": 549}))
            .unwrap();
        cart.add_item(&json!({"id": 1, "title": "Phone", "price": 549}))
            .unwrap();
        cart.add_item(&json!({"id": "cable", "title": "Cable", "price": "9.99"}))
            .unwrap();
    }

    let state = open_profile(dir.path(), None).unwrap();
    let cart = state.cart();
    let items = cart.items();

    assert_eq!(items.len(), 2);
    assert_eq!(items.first().unwrap().id, ProductId::Number(1));
    assert_eq!(items.first().unwrap().quantity.get(), 2);
    assert_eq!(items.first().unwrap().title(), Some("Phone"));
    assert_eq!(items.get(1).unwrap().id, ProductId::from("cable"));
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), Decimal::new(110_799, 2));
}

#[test]
fn test_removal_and_clear_are_persisted() {
    let dir = tempfile::tempdir().unwrap();

    let state = open_profile(dir.path(), None).unwrap();
    state
        .cart()
        .add_item(&json!({"id": 1, "price": 10}))
        .unwrap();
    state
        .cart()
        .add_item(&json!({"id": 2, "price": 20}))
        .unwrap();
    state.cart().set_quantity(&ProductId::Number(2), 0);
    drop(state);

    let state = open_profile(dir.path(), None).unwrap();
    assert_eq!(state.cart().items().len(), 1);
    state.cart().clear();
    drop(state);

    let state = open_profile(dir.path(), None).unwrap();
    assert!(state.cart().items().is_empty());
    assert_eq!(state.cart().total(), Decimal::ZERO);
}

#[test]
fn test_stored_cart_is_plain_json_array() {
    let dir = tempfile::tempdir().unwrap();

    let state = open_profile(dir.path(), None).unwrap();
    state
        .cart()
        .add_item(&json!({"id": 7, "title": "Tablet", "price": 300}))
        .unwrap();
    drop(state);

    let storage = FileStorage::open(dir.path()).unwrap();
    let raw = storage.read(keys::CART).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let line = value.as_array().unwrap().first().unwrap();
    assert_eq!(line["id"], json!(7));
    assert_eq!(line["title"], json!("Tablet"));
    assert_eq!(line["quantity"], json!(1));
}

// =============================================================================
// Damaged Profile Tests
// =============================================================================

#[test]
fn test_malformed_cart_value_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    FileStorage::open(dir.path())
        .unwrap()
        .write(keys::CART, "this is not json")
        .unwrap();

    let state = open_profile(dir.path(), None).unwrap();
    assert!(state.cart().items().is_empty());

    // The next mutation overwrites the bad value.
    state
        .cart()
        .add_item(&json!({"id": 3, "price": 5}))
        .unwrap();
    drop(state);

    let state = open_profile(dir.path(), None).unwrap();
    assert_eq!(state.cart().item_count(), 1);
}

#[test]
fn test_corrupt_document_recovers_on_next_mutation() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("storage.json"), "garbage").unwrap();

    let state = open_profile(dir.path(), None).unwrap();
    assert!(state.cart().items().is_empty());

    state
        .cart()
        .add_item(&json!({"id": "p1", "price": 10}))
        .unwrap();
    assert_eq!(state.cart().item_count(), 1);
    drop(state);

    let state = open_profile(dir.path(), None).unwrap();
    assert_eq!(state.cart().item_count(), 1);
    assert_eq!(state.cart().total(), Decimal::from(10));

    // The unreadable document is kept for inspection.
    let aside = std::fs::read_to_string(dir.path().join("storage.json.corrupt")).unwrap();
    assert_eq!(aside, "garbage");
}

// =============================================================================
// Shared Handle Tests
// =============================================================================

#[tokio::test]
async fn test_subscribers_see_mutations_from_other_handles() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_profile(dir.path(), None).unwrap();

    let mut badge = state.cart().subscribe();
    let page = state.clone();

    page.cart()
        .add_item(&json!({"id": 1, "price": 100}))
        .unwrap();

    assert!(badge.has_changed().unwrap());
    let snapshot = badge.borrow_and_update().clone();
    assert_eq!(snapshot.item_count(), 1);
    assert_eq!(snapshot.total(), Decimal::from(100));
}
