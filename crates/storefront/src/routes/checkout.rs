//! Checkout route handlers.
//!
//! Order placement is a simulation: totals are computed server-side
//! from the live cart, a random order number is issued, and the cart
//! is cleared. No payment provider is involved.

use axum::{Json, extract::State};
use rand::Rng;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::CartStore;
use crate::checkout::OrderSummary;
use crate::error::{AppError, Result};
use crate::middleware::OwnerIdentity;
use crate::state::AppState;

/// Current cart totals: subtotal, flat shipping, tax, and total.
#[instrument(skip(state, session, owner))]
pub async fn summary(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);
    let items = store.list().await?;
    let summary = OrderSummary::calculate(&items);

    Ok(Json(json!({ "items": items, "summary": summary })))
}

/// Place a simulated order for the current cart, then clear it.
#[instrument(skip(state, session, owner))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);
    let items = store.list().await?;

    if items.is_empty() {
        return Err(AppError::Validation("Cart is empty".to_string()));
    }

    let summary = OrderSummary::calculate(&items);
    let order_number = format!("TH-{:06}", rand::rng().random_range(0..1_000_000));

    store.clear().await?;

    tracing::info!(order_number = %order_number, total = %summary.total, "Order placed");
    Ok(Json(json!({
        "orderNumber": order_number,
        "summary": summary,
    })))
}
