//! Integration tests for registration, login, and sessions.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p trailhead-storefront)
//!
//! Run with: cargo test -p trailhead-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use trailhead_integration_tests::{base_url, client, register_fresh_user, unique_email};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_logs_user_in() {
    let client = client();
    let email = register_fresh_user(&client).await;

    let resp = client
        .get(format!("{}/api/auth/session", base_url()))
        .send()
        .await
        .expect("Failed to fetch session");
    let body: Value = resp.json().await.expect("Failed to parse session");
    assert_eq!(body["user"]["email"], email);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_duplicate_email_conflicts() {
    let client = client();
    let email = register_fresh_user(&client).await;

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({ "email": email, "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_rejects_weak_password() {
    let client = client();

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({ "email": unique_email(), "password": "short" }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_login_wrong_password_is_unauthorized() {
    let client = client();
    let email = register_fresh_user(&client).await;

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_login_unknown_email_is_unauthorized() {
    let client = client();

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": unique_email(), "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_signout_clears_session() {
    let client = client();
    register_fresh_user(&client).await;

    let resp = client
        .post(format!("{}/api/auth/signout", base_url()))
        .send()
        .await
        .expect("Failed to sign out");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/auth/session", base_url()))
        .send()
        .await
        .expect("Failed to fetch session");
    let body: Value = resp.json().await.expect("Failed to parse session");
    assert!(body["user"].is_null());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_session_is_null_for_guest() {
    let client = client();

    let resp = client
        .get(format!("{}/api/auth/session", base_url()))
        .send()
        .await
        .expect("Failed to fetch session");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse session");
    assert!(body["user"].is_null());
}
