//! Integration tests for the Trailhead Supply storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations + seed data
//! cargo run -p trailhead-cli -- migrate
//! cargo run -p trailhead-cli -- seed
//!
//! # Start the storefront
//! cargo run -p trailhead-storefront
//!
//! # Run the (ignored) integration tests
//! cargo test -p trailhead-integration-tests -- --ignored
//! ```
//!
//! Each test builds its own cookie-holding client, so every test runs
//! in a fresh anonymous session.

use rand::Rng;
use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client with its own cookie store (fresh session).
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email for registration tests.
#[must_use]
pub fn unique_email() -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("it-{suffix}@example.com")
}

/// Register a fresh account on the given client and return its email.
/// The client's session is logged in afterwards.
///
/// # Panics
///
/// Panics if the request fails or registration is rejected.
pub async fn register_fresh_user(client: &Client) -> String {
    let email = unique_email();
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({ "email": email, "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("Failed to register");
    assert!(
        resp.status().is_success(),
        "registration failed: {}",
        resp.status()
    );
    email
}

/// Add a product to the client's cart and return the created line.
///
/// # Panics
///
/// Panics if the request fails or the add is rejected.
pub async fn add_to_cart(client: &Client, product_id: i32, quantity: i32) -> Value {
    let resp = client
        .post(format!("{}/cart", base_url()))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert!(resp.status().is_success(), "add failed: {}", resp.status());

    let body: Value = resp.json().await.expect("Failed to parse add response");
    body["item"].clone()
}

/// Fetch the client's cart lines.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn cart_items(client: &Client) -> Vec<Value> {
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.expect("Failed to parse cart response");
    body["items"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}
