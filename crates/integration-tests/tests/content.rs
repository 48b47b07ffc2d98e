//! Integration tests for editorial content blocks.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p northloom-api)
//! - The staff test account (see crate docs)
//!
//! Run with: cargo test -p northloom-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use northloom_integration_tests::{base_url, client, staff_token, unique_name};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_content_create_requires_token() {
    let client = client();

    let resp = client
        .post(format!("{}/api/content/create", base_url()))
        .json(&json!({ "title": unique_name("title"), "description": "text" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_content_lifecycle() {
    let client = client();
    let token = staff_token(&client).await;
    let title = unique_name("title");

    // Create
    let resp = client
        .post(format!("{}/api/content/create", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "title": title, "description": "First draft" }))
        .send()
        .await
        .expect("Failed to create content");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let content_id = body["id"].as_i64().expect("Content carried no id");

    // Public read
    let resp = client
        .get(format!("{}/api/content/{content_id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch content");
    assert_eq!(resp.status(), StatusCode::OK);

    // Partial update keeps the title
    let resp = client
        .put(format!("{}/api/content/update", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "id": content_id, "description": "Second draft" }))
        .send()
        .await
        .expect("Failed to update content");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["title"], title.as_str());
    assert_eq!(body["description"], "Second draft");

    // Title filter finds it
    let resp = client
        .get(format!("{}/api/content?title={title}", base_url()))
        .send()
        .await
        .expect("Failed to list content");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Delete
    let resp = client
        .delete(format!("{}/api/content/{content_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete content");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/content/{content_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
