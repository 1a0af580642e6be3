//! Product catalog route handlers.
//!
//! Read-only JSON views over the catalog. All reads go through the
//! cached catalog accessor on [`AppState`], so repeated listing hits
//! the database at most once per cache window.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use trailhead_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Query parameters for the featured selection.
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub count: Option<usize>,
}

/// Default number of featured products.
const DEFAULT_FEATURED_COUNT: usize = 4;

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let products = match query.category.as_deref() {
        Some(category) => state.catalog().get_by_category(category).await?,
        None => state.catalog().get_all().await?,
    };

    Ok(Json(json!({ "products": &*products })))
}

/// The first N catalog products, as featured on the home page.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Value>> {
    let count = query.count.unwrap_or(DEFAULT_FEATURED_COUNT);
    let products = state.catalog().get_featured(count).await?;

    Ok(Json(json!({ "products": products })))
}

/// Single product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let product = state
        .catalog()
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "product": &*product })))
}
