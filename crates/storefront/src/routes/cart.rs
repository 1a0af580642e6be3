//! Cart route handlers.
//!
//! Thin JSON adapters over [`CartStore`]: the handlers parse the
//! request, resolve the owner via [`OwnerIdentity`], and return the
//! mutated line (or deletion marker) directly so clients never need a
//! follow-up read to learn the outcome of a write.

use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use trailhead_core::ProductId;

use crate::cart::{CartStore, SetQuantityOutcome};
use crate::error::{AppError, Result};
use crate::middleware::OwnerIdentity;
use crate::state::AppState;

fn default_quantity() -> i32 {
    1
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub item_id: String,
    pub quantity: i32,
}

/// Removal request body: one line by ID, or the whole cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub item_id: Option<String>,
    #[serde(default)]
    pub clear_all: bool,
}

/// List the current owner's cart with enriched lines.
#[instrument(skip(state, session, owner))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);
    let items = store.list().await?;

    Ok(Json(json!({ "items": items })))
}

/// Add a product variant to the cart, merging into an existing line
/// with the same (product, size, color).
#[instrument(skip(state, session, owner))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);
    let item = store
        .add(
            ProductId::new(request.product_id),
            request.quantity,
            request.size,
            request.color,
        )
        .await?;

    Ok(Json(json!({ "item": item })))
}

/// Set a line's quantity; zero or below deletes the line.
#[instrument(skip(state, session, owner))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);

    match store.set_quantity(&request.item_id, request.quantity).await? {
        SetQuantityOutcome::Updated(item) => Ok(Json(json!({ "item": item }))),
        SetQuantityOutcome::Deleted => Ok(Json(json!({ "success": true, "deleted": true }))),
    }
}

/// Remove one line or clear the whole cart.
#[instrument(skip(state, session, owner))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);

    if request.clear_all {
        store.clear().await?;
        return Ok(Json(json!({ "success": true })));
    }

    let Some(item_id) = request.item_id else {
        return Err(AppError::Validation(
            "Either itemId or clearAll is required".to_string(),
        ));
    };

    store.remove(&item_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Total quantity across all lines, for the header badge.
#[instrument(skip(state, session, owner))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    OwnerIdentity(owner): OwnerIdentity,
) -> Result<Json<Value>> {
    let store = CartStore::new(&state, &session, &owner);
    let count = store.count().await?;

    Ok(Json(json!({ "count": count })))
}
