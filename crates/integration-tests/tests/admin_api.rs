//! Admin client against a stub admin API and the live demo API.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::{Value, json};
use url::Url;

use techstore_admin::api::ProductDraft;
use techstore_admin::config::AdminConfig;
use techstore_admin::{AdminClient, AdminError, filter_and_paginate};
use techstore_core::{CategoryId, ProductId};
use techstore_integration_tests::{StubRoute, StubServer};

fn client(server: &StubServer) -> AdminClient {
    AdminClient::new(&AdminConfig::new(server.url()))
}

fn product_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": 25,
        "description": "A product",
        "category": {"id": 1, "name": "Clothes"},
        "images": ["https://example.com/a.jpg"],
        "creationAt": "2024-01-01T00:00:00.000Z"
    })
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_list_users_and_paginate() {
    let users: Vec<Value> = (1..=23)
        .map(|i| {
            let name = if i % 2 == 0 { "Maria" } else { "Jhon" };
            json!({
                "id": i,
                "email": format!("user{i}@mail.com"),
                "password": "changeme",
                "name": name,
                "role": "customer",
                "avatar": "https://example.com/avatar.png"
            })
        })
        .collect();
    let server = StubServer::start(vec![StubRoute::new(
        "GET",
        "/users",
        200,
        Value::Array(users).to_string(),
    )])
    .await
    .unwrap();

    let users = client(&server).list_users().await.unwrap();
    assert_eq!(users.len(), 23);

    let page = filter_and_paginate(&users, "", 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 3);
    assert!(!page.has_next());

    let page = filter_and_paginate(&users, " MARIA ", 1);
    assert_eq!(page.total_items, 11);
    assert_eq!(page.total_pages, 2);
    assert!(page.items.iter().all(|u| u.name == "Maria"));
}

#[tokio::test]
async fn test_list_products() {
    let body = json!([product_json(1, "Shirt"), product_json(2, "Shoes")]).to_string();
    let server = StubServer::start(vec![StubRoute::new("GET", "/products", 200, body)])
        .await
        .unwrap();

    let products = client(&server).list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products.first().unwrap().price, Decimal::from(25));

    let page = filter_and_paginate(&products, "sho", 1);
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items.first().unwrap().title, "Shoes");
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[tokio::test]
async fn test_create_product_sends_draft() {
    let server = StubServer::start(vec![StubRoute::new(
        "POST",
        "/products",
        201,
        product_json(99, "Lamp").to_string(),
    )])
    .await
    .unwrap();

    let draft = ProductDraft::new("Lamp", Decimal::new(1999, 2), "Desk lamp")
        .with_category(CategoryId::new(3));
    let created = client(&server).create_product(&draft).await.unwrap();
    assert_eq!(created.id, ProductId::Number(99));

    let requests = server.requests();
    let request = requests.first().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path(), "/products");

    let sent: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent["title"], json!("Lamp"));
    assert_eq!(sent["price"], json!(19.99));
    assert_eq!(sent["categoryId"], json!(3));
    assert_eq!(sent["images"], json!(["https://placeimg.com/640/480/tech"]));
}

#[tokio::test]
async fn test_update_and_delete_product() {
    let server = StubServer::start(vec![
        StubRoute::new("GET", "/products/5", 200, product_json(5, "Hat").to_string()),
        StubRoute::new("PUT", "/products/5", 200, product_json(5, "Cap").to_string()),
        StubRoute::new("DELETE", "/products/5", 200, "true"),
    ])
    .await
    .unwrap();
    let client = client(&server);
    let id = ProductId::Number(5);

    let existing = client.get_product(&id).await.unwrap();
    let mut draft = ProductDraft::from_product(&existing);
    draft.title = "Cap".to_string();
    let updated = client.update_product(&id, &draft).await.unwrap();
    assert_eq!(updated.title, "Cap");

    client.delete_product(&id).await.unwrap();

    let methods: Vec<String> = server.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, ["GET", "PUT", "DELETE"]);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let server = StubServer::start(Vec::new()).await.unwrap();

    let result = client(&server).delete_product(&ProductId::Number(404)).await;
    assert!(matches!(result, Err(AdminError::NotFound(_))));
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() {
    let server = StubServer::start(vec![StubRoute::new(
        "GET",
        "/users",
        500,
        r#"{"message":"boom"}"#,
    )])
    .await
    .unwrap();

    let Err(AdminError::Status { status, body }) = client(&server).list_users().await else {
        panic!("expected a status error");
    };
    assert_eq!(status, 500);
    assert!(body.contains("boom"));
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/users", 200, "[]")])
        .await
        .unwrap();
    let base = server.url().to_string();
    let config = AdminConfig::from_lookup(|key| match key {
        "TECHSTORE_ADMIN_API_URL" => Some(base.clone()),
        "TECHSTORE_ADMIN_API_TOKEN" => Some("s3cret".to_string()),
        _ => None,
    })
    .unwrap();

    AdminClient::new(&config).list_users().await.unwrap();

    let requests = server.requests();
    let auth = requests.first().unwrap().headers.get("authorization");
    assert_eq!(auth.map(String::as_str), Some("Bearer s3cret"));
}

// =============================================================================
// Live API Tests
// =============================================================================

#[tokio::test]
#[ignore = "requires network access to api.escuelajs.co"]
async fn test_live_list_products() {
    let config = AdminConfig::new(Url::parse("https://api.escuelajs.co/api/v1").unwrap());
    let products = AdminClient::new(&config).list_products().await.unwrap();
    assert!(!products.is_empty());
}
