//! Integration tests for the catalog: categories, subcategories, products.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p northloom-api)
//! - The staff test account (see crate docs)
//!
//! Run with: cargo test -p northloom-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use northloom_integration_tests::{
    base_url, client, create_category, create_product_with_stock, create_subcategory, staff_token,
    stock_for_size, unique_name,
};

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_create_requires_token() {
    let client = client();

    let resp = client
        .post(format!("{}/api/categories/create", base_url()))
        .json(&json!({ "name": unique_name("category") }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_category_name_conflicts() {
    let client = client();
    let token = staff_token(&client).await;
    let name = unique_name("category");

    create_category(&client, &token, &name).await;

    let resp = client
        .post(format!("{}/api/categories/create", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(body["detail"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_rename() {
    let client = client();
    let token = staff_token(&client).await;

    let id = create_category(&client, &token, &unique_name("category")).await;
    let new_name = unique_name("renamed");

    let resp = client
        .put(format!("{}/api/categories/update", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "id": id, "name": new_name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["name"], new_name.as_str());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_category_products_is_404() {
    let client = client();

    let resp = client
        .get(format!("{}/api/categories/999999999", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_products_listing_paginated() {
    let client = client();
    let token = staff_token(&client).await;

    let category_id = create_category(&client, &token, &unique_name("category")).await;
    let subcategory_id = create_subcategory(&client, &token, &unique_name("subcategory")).await;

    for _ in 0..3 {
        create_product_with_stock(&client, &token, category_id, subcategory_id, "M", 1).await;
    }

    let resp = client
        .get(format!(
            "{}/api/categories/{category_id}?offset=1&limit=1",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_negative_pagination_treated_as_zero() {
    let client = client();

    let resp = client
        .get(format!("{}/api/products?offset=-1&limit=-5", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_create_persists_inventory() {
    let client = client();
    let token = staff_token(&client).await;

    let category_id = create_category(&client, &token, &unique_name("category")).await;
    let subcategory_id = create_subcategory(&client, &token, &unique_name("subcategory")).await;

    let product_id =
        create_product_with_stock(&client, &token, category_id, subcategory_id, "M", 7).await;

    assert_eq!(stock_for_size(&client, product_id, "M").await, 7);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_create_with_unknown_category_rejected() {
    let client = client();
    let token = staff_token(&client).await;

    let subcategory_id = create_subcategory(&client, &token, &unique_name("subcategory")).await;

    let resp = client
        .post(format!("{}/api/products/create", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "name": unique_name("product"),
            "article": unique_name("art"),
            "base_price": "99.00",
            "category_id": 999999999,
            "subcategory_id": subcategory_id,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_update_upserts_inventory() {
    let client = client();
    let token = staff_token(&client).await;

    let category_id = create_category(&client, &token, &unique_name("category")).await;
    let subcategory_id = create_subcategory(&client, &token, &unique_name("subcategory")).await;
    let product_id =
        create_product_with_stock(&client, &token, category_id, subcategory_id, "M", 4).await;

    // Overwrite one size and introduce another in a single call
    let resp = client
        .put(format!("{}/api/products/update", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "id": product_id,
            "inventory": [
                { "size": "M", "quantity": 10 },
                { "size": "XL", "quantity": 2 },
            ],
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stock_for_size(&client, product_id, "M").await, 10);
    assert_eq!(stock_for_size(&client, product_id, "XL").await, 2);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_delete_cascades_to_products() {
    let client = client();
    let token = staff_token(&client).await;

    let category_id = create_category(&client, &token, &unique_name("category")).await;
    let subcategory_id = create_subcategory(&client, &token, &unique_name("subcategory")).await;
    let product_id =
        create_product_with_stock(&client, &token, category_id, subcategory_id, "M", 1).await;

    let resp = client
        .delete(format!("{}/api/categories/{category_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
