//! Persistent cart backend (per-user database rows).
//!
//! Every operation runs through [`with_retry`]: transient connectivity
//! failures are retried with backoff and then surfaced as
//! `BackendUnavailable`, leaving state unchanged. There is no fallback
//! to the guest backend for an authenticated owner.

use sqlx::PgPool;

use trailhead_core::{CartLineId, UserId};

use crate::db::cart::CartRepository;
use crate::db::{RepositoryError, with_retry};
use crate::error::{AppError, Result};
use crate::models::{CartItem, GuestLine, LineKey, Product};

use super::{SetQuantityOutcome, line_not_found};

/// Cart backend for a resolved user, writing to `cart_line` rows.
pub struct PersistentBackend<'a> {
    pool: &'a PgPool,
    user_id: UserId,
}

impl<'a> PersistentBackend<'a> {
    /// Create a backend bound to one owner.
    #[must_use]
    pub const fn new(pool: &'a PgPool, user_id: UserId) -> Self {
        Self { pool, user_id }
    }

    /// The owner this backend writes for.
    pub(super) const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Enriched lines, most recently created first.
    pub async fn list(&self) -> Result<Vec<CartItem>> {
        with_retry("cart.list", || async {
            CartRepository::new(self.pool)
                .list_for_user(self.user_id)
                .await
        })
        .await
        .map_err(backend_error)
    }

    /// Add-or-increment as one conditional write; returns the line.
    pub async fn add(&self, key: &LineKey, quantity: i32, product: &Product) -> Result<CartItem> {
        let (line_id, new_quantity) = with_retry("cart.add", || async {
            CartRepository::new(self.pool)
                .add_line(self.user_id, key, quantity)
                .await
        })
        .await
        .map_err(backend_error)?;

        Ok(CartItem {
            id: line_id.to_string(),
            product_id: key.product_id,
            name: product.name.clone(),
            price: product.price,
            quantity: new_quantity,
            size: key.size.clone(),
            color: key.color.clone(),
        })
    }

    /// Update a line's quantity; quantity <= 0 deletes it.
    pub async fn set_quantity(&self, line_id: &str, quantity: i32) -> Result<SetQuantityOutcome> {
        let id = parse_line_id(line_id)?;

        if quantity <= 0 {
            let deleted = with_retry("cart.set_quantity.delete", || async {
                CartRepository::new(self.pool).delete_line(self.user_id, id).await
            })
            .await
            .map_err(backend_error)?;

            if !deleted {
                return Err(line_not_found());
            }
            return Ok(SetQuantityOutcome::Deleted);
        }

        let item = with_retry("cart.set_quantity", || async {
            CartRepository::new(self.pool)
                .set_quantity(self.user_id, id, quantity)
                .await
        })
        .await
        .map_err(backend_error)?;

        Ok(SetQuantityOutcome::Updated(item))
    }

    /// Remove a line; `NotFound` when absent or owned by someone else.
    pub async fn remove(&self, line_id: &str) -> Result<()> {
        let id = parse_line_id(line_id)?;
        let deleted = with_retry("cart.remove", || async {
            CartRepository::new(self.pool).delete_line(self.user_id, id).await
        })
        .await
        .map_err(backend_error)?;

        if deleted { Ok(()) } else { Err(line_not_found()) }
    }

    /// Delete all of the owner's lines.
    pub async fn clear(&self) -> Result<()> {
        with_retry("cart.clear", || async {
            CartRepository::new(self.pool).clear(self.user_id).await
        })
        .await
        .map_err(backend_error)
    }

    /// Sum of quantities; 0 for an empty cart.
    pub async fn count(&self) -> Result<i64> {
        with_retry("cart.count", || async {
            CartRepository::new(self.pool).count(self.user_id).await
        })
        .await
        .map_err(backend_error)
    }

    /// Fold guest lines into the owner's cart, summing quantities per
    /// identity key, in one transaction.
    pub(super) async fn merge(&self, lines: &[GuestLine]) -> Result<()> {
        with_retry("cart.merge", || async {
            CartRepository::new(self.pool)
                .merge_lines(self.user_id, lines)
                .await
        })
        .await
        .map_err(backend_error)
    }
}

/// Parse a client-supplied line ID for the persistent backend.
///
/// A non-numeric ID cannot name one of this owner's rows, so it maps
/// to the same `NotFound` as a missing line.
fn parse_line_id(line_id: &str) -> Result<CartLineId> {
    line_id
        .parse::<i32>()
        .map(CartLineId::new)
        .map_err(|_| line_not_found())
}

/// Map persistent-backend errors for the caller: transient connectivity
/// failures become `BackendUnavailable` (503), a missing row becomes
/// `NotFound`, anything else is an internal database error.
fn backend_error(e: RepositoryError) -> AppError {
    if e.is_transient() {
        return AppError::BackendUnavailable;
    }
    match e {
        RepositoryError::NotFound => line_not_found(),
        other => AppError::Database(other),
    }
}
