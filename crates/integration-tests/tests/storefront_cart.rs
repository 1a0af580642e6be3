//! Integration tests for cart operations.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - The storefront server running (cargo run -p trailhead-storefront)
//!
//! Run with: cargo test -p trailhead-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use trailhead_integration_tests::{add_to_cart, base_url, cart_items, client, register_fresh_user};

// ============================================================================
// Guest Cart Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_guest_cart_starts_empty() {
    let client = client();

    let items = cart_items(&client).await;
    assert!(items.is_empty());

    let resp = client
        .get(format!("{}/cart/count", base_url()))
        .send()
        .await
        .expect("Failed to fetch count");
    let body: Value = resp.json().await.expect("Failed to parse count");
    assert_eq!(body["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_guest_add_merges_same_variant() {
    let client = client();

    // Seeded product 1 is the $89.99 fleece jacket
    let first = add_to_cart(&client, 1, 2).await;
    let second = add_to_cart(&client, 1, 1).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["quantity"], 3);

    let items = cart_items(&client).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["price"], "89.99");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_guest_update_quantity_zero_deletes() {
    let client = client();
    let item = add_to_cart(&client, 2, 1).await;

    let resp = client
        .put(format!("{}/cart", base_url()))
        .json(&json!({ "itemId": item["id"], "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse update");
    assert_eq!(body["deleted"], true);
    assert!(cart_items(&client).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_guest_remove_unknown_line_is_404() {
    let client = client();

    let resp = client
        .delete(format!("{}/cart", base_url()))
        .json(&json!({ "itemId": "999--" }))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_unknown_product_is_404() {
    let client = client();

    let resp = client
        .post(format!("{}/cart", base_url()))
        .json(&json!({ "productId": 999_999, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_zero_quantity_is_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/cart", base_url()))
        .json(&json!({ "productId": 1, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_quantity_above_cap_is_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/cart", base_url()))
        .json(&json!({ "productId": 1, "quantity": 100 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Repeated adds saturate at the cap instead of growing without bound
    add_to_cart(&client, 1, 99).await;
    let item = add_to_cart(&client, 1, 99).await;
    assert_eq!(item["quantity"], 99);
}

// ============================================================================
// Authenticated Cart Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_authenticated_cart_roundtrip() {
    let client = client();
    register_fresh_user(&client).await;

    let item = add_to_cart(&client, 3, 1).await;
    // Persistent lines have numeric database IDs
    assert!(
        item["id"]
            .as_str()
            .expect("line id")
            .parse::<i32>()
            .is_ok()
    );

    let resp = client
        .put(format!("{}/cart", base_url()))
        .json(&json!({ "itemId": item["id"], "quantity": 4 }))
        .send()
        .await
        .expect("Failed to update");
    let body: Value = resp.json().await.expect("Failed to parse update");
    assert_eq!(body["item"]["quantity"], 4);

    let resp = client
        .delete(format!("{}/cart", base_url()))
        .json(&json!({ "clearAll": true }))
        .send()
        .await
        .expect("Failed to clear");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(cart_items(&client).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_carts_are_isolated_between_users() {
    let alice = client();
    register_fresh_user(&alice).await;
    let item = add_to_cart(&alice, 1, 1).await;

    let bob = client();
    register_fresh_user(&bob).await;

    // Bob cannot see Alice's line
    assert!(cart_items(&bob).await.is_empty());

    // Bob cannot mutate Alice's line either
    let resp = bob
        .put(format!("{}/cart", base_url()))
        .json(&json!({ "itemId": item["id"], "quantity": 5 }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Alice's line is untouched
    let items = cart_items(&alice).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_guest_cart_merges_on_login() {
    let client = client();
    let email = register_fresh_user(&client).await;
    add_to_cart(&client, 6, 1).await;

    // Sign out, shop as a guest in the same browser
    let resp = client
        .post(format!("{}/api/auth/signout", base_url()))
        .send()
        .await
        .expect("Failed to sign out");
    assert_eq!(resp.status(), StatusCode::OK);

    add_to_cart(&client, 6, 2).await;

    // Logging back in folds the guest line into the persistent one
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let items = cart_items(&client).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
}
