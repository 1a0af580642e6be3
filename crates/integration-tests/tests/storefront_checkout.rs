//! Integration tests for checkout totals and order placement.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - The storefront server running (cargo run -p trailhead-storefront)
//!
//! Run with: cargo test -p trailhead-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;

use trailhead_integration_tests::{add_to_cart, base_url, cart_items, client};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_summary_totals_for_seeded_jacket() {
    let client = client();
    // 3 x $89.99 fleece jackets
    add_to_cart(&client, 1, 3).await;

    let resp = client
        .get(format!("{}/checkout/summary", base_url()))
        .send()
        .await
        .expect("Failed to fetch summary");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse summary");
    let summary = &body["summary"];
    assert_eq!(summary["subtotal"], "269.97");
    assert_eq!(summary["shipping"], "5.99");
    // 269.97 * 8% = 21.5976 -> 21.60
    assert_eq!(summary["tax"], "21.60");
    assert_eq!(summary["total"], "297.56");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_summary_of_empty_cart_is_zero() {
    let client = client();

    let resp = client
        .get(format!("{}/checkout/summary", base_url()))
        .send()
        .await
        .expect("Failed to fetch summary");
    let body: Value = resp.json().await.expect("Failed to parse summary");
    let summary = &body["summary"];
    assert_eq!(summary["subtotal"], "0");
    assert_eq!(summary["shipping"], "0");
    assert_eq!(summary["total"], "0");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_place_order_clears_cart() {
    let client = client();
    add_to_cart(&client, 6, 2).await;

    let resp = client
        .post(format!("{}/checkout/order", base_url()))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse order");
    assert!(
        body["orderNumber"]
            .as_str()
            .expect("order number")
            .starts_with("TH-")
    );

    assert!(cart_items(&client).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_place_order_with_empty_cart_is_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/checkout/order", base_url()))
        .send()
        .await
        .expect("Failed to send order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
