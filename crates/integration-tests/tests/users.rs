//! Integration tests for account administration.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p northloom-api)
//! - The staff and admin test accounts (see crate docs)
//!
//! Run with: cargo test -p northloom-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use northloom_integration_tests::{admin_token, base_url, client, staff_token, unique_name};

fn test_email() -> String {
    format!("{}@example.com", unique_name("user"))
}

// ============================================================================
// Role gating
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_staff_cannot_manage_accounts() {
    let client = client();
    let token = staff_token(&client).await;

    let resp = client
        .post(format!("{}/api/users/create", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "email": test_email(), "password": "some-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["detail"], "Not enough permissions");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_user_listing_requires_admin() {
    let client = client();
    let token = staff_token(&client).await;

    let resp = client
        .get(format!("{}/api/users", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Account lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_admin_creates_and_deletes_account() {
    let client = client();
    let admin = admin_token(&client).await;
    let email = test_email();

    let resp = client
        .post(format!("{}/api/users/create", base_url()))
        .bearer_auth(&admin)
        .json(&json!({ "email": email, "password": "some-password", "is_staff": true }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse body");
    let user_id = body["id"].as_i64().expect("User carried no id");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["is_staff"], true);
    // The hash must never leave the server
    assert!(body.get("password_hash").is_none());

    let resp = client
        .delete(format!("{}/api/users/{user_id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete user");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/users/{user_id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_conflicts() {
    let client = client();
    let admin = admin_token(&client).await;
    let email = test_email();

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let resp = client
            .post(format!("{}/api/users/create", base_url()))
            .bearer_auth(&admin)
            .json(&json!({ "email": email, "password": "some-password" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_short_password_rejected() {
    let client = client();
    let admin = admin_token(&client).await;

    let resp = client
        .post(format!("{}/api/users/create", base_url()))
        .bearer_auth(&admin)
        .json(&json!({ "email": test_email(), "password": "short" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_role_flags_updated_by_admin() {
    let client = client();
    let admin = admin_token(&client).await;
    let email = test_email();

    let resp = client
        .post(format!("{}/api/users/create", base_url()))
        .bearer_auth(&admin)
        .json(&json!({ "email": email, "password": "some-password" }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let user_id = body["id"].as_i64().expect("User carried no id");
    assert_eq!(body["is_staff"], false);

    let resp = client
        .put(format!("{}/api/users/update", base_url()))
        .bearer_auth(&admin)
        .json(&json!({ "id": user_id, "is_staff": true }))
        .send()
        .await
        .expect("Failed to update user");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["is_staff"], true);
    assert_eq!(body["is_superuser"], false);
}
