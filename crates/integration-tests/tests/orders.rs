//! Integration tests for order placement, inventory movements, and returns.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p northloom-api)
//! - The staff test account (see crate docs)
//!
//! Run with: cargo test -p northloom-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use northloom_integration_tests::{
    base_url, client, create_category, create_product_with_stock, create_subcategory, staff_token,
    stock_for_size, unique_name,
};

/// Create a fresh product with the given stock and return its ID.
async fn product_with_stock(client: &Client, token: &str, size: &str, quantity: i32) -> i64 {
    let category_id = create_category(client, token, &unique_name("category")).await;
    let subcategory_id = create_subcategory(client, token, &unique_name("subcategory")).await;
    create_product_with_stock(client, token, category_id, subcategory_id, size, quantity).await
}

/// Place an order for one line and return the response.
async fn place_order(
    client: &Client,
    product_id: i64,
    size: &str,
    quantity: i32,
) -> reqwest::Response {
    client
        .post(format!("{}/api/orders/create", base_url()))
        .json(&json!({
            "full_name": "Integration Test",
            "telephone": unique_name("tel"),
            "items": [{
                "product_id": product_id,
                "size": size,
                "quantity": quantity,
                "price": "129.00",
            }],
        }))
        .send()
        .await
        .expect("Failed to place order")
}

// ============================================================================
// Placement
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_decrements_inventory() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "M", 10).await;

    let resp = place_order(&client, product_id, "M", 3).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["returned"], false);

    assert_eq!(stock_for_size(&client, product_id, "M").await, 7);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_oversell_is_rejected_and_rolls_back() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "M", 2).await;

    let resp = place_order(&client, product_id, "M", 5).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The failed order must not have touched stock
    assert_eq!(stock_for_size(&client, product_id, "M").await, 2);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_for_unknown_size_is_404() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "M", 5).await;

    let resp = place_order(&client, product_id, "XXL", 1).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_negative_item_price_is_rejected() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "M", 5).await;

    let resp = client
        .post(format!("{}/api/orders/create", base_url()))
        .json(&json!({
            "full_name": "Integration Test",
            "telephone": unique_name("tel"),
            "items": [{
                "product_id": product_id,
                "size": "M",
                "quantity": 1,
                "price": "-1.00",
            }],
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stock_for_size(&client, product_id, "M").await, 5);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_ordered_product_cannot_be_deleted() {
    let client = client();
    let token = staff_token(&client).await;

    let category_id = create_category(&client, &token, &unique_name("category")).await;
    let subcategory_id = create_subcategory(&client, &token, &unique_name("subcategory")).await;
    let product_id =
        create_product_with_stock(&client, &token, category_id, subcategory_id, "M", 5).await;

    let resp = place_order(&client, product_id, "M", 1).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Order history pins the product in place
    let resp = client
        .delete(format!("{}/api/products/{product_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The category cascade would reach the same product, so it is refused too
    let resp = client
        .delete(format!("{}/api/categories/{category_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Nothing was deleted along the way
    assert_eq!(stock_for_size(&client, product_id, "M").await, 4);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_empty_order_is_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/api/orders/create", base_url()))
        .json(&json!({
            "full_name": "Integration Test",
            "telephone": unique_name("tel"),
            "items": [],
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Returns
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_return_restocks_inventory_once() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "L", 10).await;

    let resp = place_order(&client, product_id, "L", 4).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("Order carried no id");

    assert_eq!(stock_for_size(&client, product_id, "L").await, 6);

    let resp = client
        .put(format!("{}/api/orders/{order_id}/return", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to return order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(body["returned"], true);
    assert_eq!(stock_for_size(&client, product_id, "L").await, 10);

    // A second return must not restock again
    let resp = client
        .put(format!("{}/api/orders/{order_id}/return", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(stock_for_size(&client, product_id, "L").await, 10);
}

// ============================================================================
// Back office
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_listing_requires_staff() {
    let client = client();

    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_orders_looked_up_by_telephone() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "S", 10).await;

    let telephone = unique_name("tel");
    let resp = client
        .post(format!("{}/api/orders/create", base_url()))
        .json(&json!({
            "full_name": "Integration Test",
            "telephone": telephone,
            "items": [{
                "product_id": product_id,
                "size": "S",
                "quantity": 1,
                "price": "129.00",
            }],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{}/api/orders/customer/{telephone}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["telephone"], telephone.as_str());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_flags_updated_by_staff() {
    let client = client();
    let token = staff_token(&client).await;
    let product_id = product_with_stock(&client, &token, "M", 5).await;

    let resp = place_order(&client, product_id, "M", 1).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("Order carried no id");

    let resp = client
        .put(format!("{}/api/orders/update", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "id": order_id, "paid": true, "delivered": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["paid"], true);
    assert_eq!(body["delivered"], true);
}
