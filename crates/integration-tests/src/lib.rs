//! Integration tests for Northloom.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p northloom-cli -- migrate
//!
//! # Create the accounts the tests log in with
//! cargo run -p northloom-cli -- admin create -e staff@example.com -p staff-integration-pw
//! cargo run -p northloom-cli -- admin create -e admin@example.com -p admin-integration-pw --superuser
//!
//! # Start the API server
//! cargo run -p northloom-api
//!
//! # Run the tests
//! cargo test -p northloom-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `NORTHLOOM_API_URL` - Base URL of the running server (default `http://localhost:8000`)
//! - `TEST_STAFF_EMAIL` / `TEST_STAFF_PASSWORD` - Staff account credentials
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` - Superuser account credentials

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("NORTHLOOM_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Plain HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::new()
}

/// Log in and return the bearer token.
///
/// # Panics
///
/// Panics if the request fails or the response carries no token.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");

    assert!(
        resp.status().is_success(),
        "Login failed for {email}: {}",
        resp.status()
    );

    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("Login response carried no access_token")
        .to_owned()
}

/// Log in with the configured staff account.
pub async fn staff_token(client: &Client) -> String {
    let email =
        std::env::var("TEST_STAFF_EMAIL").unwrap_or_else(|_| "staff@example.com".to_string());
    let password =
        std::env::var("TEST_STAFF_PASSWORD").unwrap_or_else(|_| "staff-integration-pw".to_string());
    login(client, &email, &password).await
}

/// Log in with the configured superuser account.
pub async fn admin_token(client: &Client) -> String {
    let email =
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-integration-pw".to_string());
    login(client, &email, &password).await
}

/// A name that cannot collide with earlier test runs.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Create a category, returning its ID.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_category(client: &Client, token: &str, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/categories/create", base_url()))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse category");
    body["id"].as_i64().expect("Category carried no id")
}

/// Create a subcategory, returning its ID.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_subcategory(client: &Client, token: &str, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/subcategories/create", base_url()))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create subcategory");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse subcategory");
    body["id"].as_i64().expect("Subcategory carried no id")
}

/// Create a product with one inventory line, returning its ID.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product_with_stock(
    client: &Client,
    token: &str,
    category_id: i64,
    subcategory_id: i64,
    size: &str,
    quantity: i32,
) -> i64 {
    let resp = client
        .post(format!("{}/api/products/create", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "name": unique_name("product"),
            "article": unique_name("art"),
            "base_price": "129.00",
            "category_id": category_id,
            "subcategory_id": subcategory_id,
            "inventory": [{ "size": size, "quantity": quantity }],
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse product");
    body["id"].as_i64().expect("Product carried no id")
}

/// Fetch a product's stock for one size.
///
/// # Panics
///
/// Panics if the request fails or the size is missing.
pub async fn stock_for_size(client: &Client, product_id: i64, size: &str) -> i64 {
    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse product");
    body["inventory"]
        .as_array()
        .expect("Product carried no inventory")
        .iter()
        .find(|level| level["size"] == size)
        .and_then(|level| level["quantity"].as_i64())
        .expect("Size missing from inventory")
}
