//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Products
//! GET  /products               - Product listing (?category= filter)
//! GET  /products/featured      - First N products (?count=, default 4)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET    /cart                 - Current cart with enriched lines
//! POST   /cart                 - Add a line (merges same variant)
//! PUT    /cart                 - Set a line's quantity (<=0 deletes)
//! DELETE /cart                 - Remove one line or clear all
//! GET    /cart/count           - Total quantity badge
//!
//! # Checkout
//! GET  /checkout/summary       - Subtotal, shipping, tax, total
//! POST /checkout/order         - Place a simulated order, clear cart
//!
//! # Auth
//! POST /auth/register          - Create account, log in
//! POST /auth/login             - Log in, merge guest cart
//! GET  /api/auth/session       - Current user or null
//! POST /api/auth/signout       - Destroy the session
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::show)
                .post(cart::add)
                .put(cart::update)
                .delete(cart::remove),
        )
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(checkout::summary))
        .route("/order", post(checkout::place_order))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the session API routes router.
pub fn session_api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(auth::current_session))
        .route("/signout", post(auth::signout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/api/auth", session_api_routes())
}
