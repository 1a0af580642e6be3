//! The cart store: one public surface over two storage backends.
//!
//! The backend is selected exactly once, when the store is built from
//! the owner produced by the authentication gate: registered users get
//! [`persistent::PersistentBackend`] (the `cart_line` table), anonymous
//! visitors get [`guest::GuestBackend`] (the session-local line list).
//! There is deliberately no fallback from the persistent backend to
//! the guest backend - a transient database failure surfaces as
//! `BackendUnavailable` after retries instead of silently writing a
//! second, divergent cart.
//!
//! The two carts meet exactly once: [`CartStore::merge_guest_cart`]
//! folds the guest lines into the persistent cart at login, summing
//! quantities per (product, size, color) identity key.

pub mod guest;
pub mod persistent;

use tower_sessions::Session;

use trailhead_core::ProductId;

use crate::db::{RepositoryError, with_retry};
use crate::error::{AppError, Result};
use crate::middleware::Owner;
use crate::models::{CartItem, LineKey, MAX_LINE_QUANTITY};
use crate::state::AppState;

use guest::GuestBackend;
use persistent::PersistentBackend;

/// Outcome of a quantity update.
#[derive(Debug)]
pub enum SetQuantityOutcome {
    /// The line was updated; the enriched line is returned.
    Updated(CartItem),
    /// The quantity dropped to zero or below and the line was deleted.
    Deleted,
}

/// The storage strategy resolved for this request.
enum Backend<'a> {
    Persistent(PersistentBackend<'a>),
    Guest(GuestBackend<'a>),
}

/// Per-request cart store bound to a resolved owner.
pub struct CartStore<'a> {
    state: &'a AppState,
    session: &'a Session,
    backend: Backend<'a>,
}

impl<'a> CartStore<'a> {
    /// Create a cart store for the given owner, selecting the backend
    /// once for all subsequent operations.
    #[must_use]
    pub fn new(state: &'a AppState, session: &'a Session, owner: &Owner) -> Self {
        let backend = match owner.user_id() {
            Some(user_id) => Backend::Persistent(PersistentBackend::new(state.pool(), user_id)),
            None => Backend::Guest(GuestBackend::new(state, session)),
        };

        Self {
            state,
            session,
            backend,
        }
    }

    /// List the owner's lines, enriched with current product name and
    /// price. Persistent carts are ordered most recently created
    /// first; guest carts keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the persistent backend stays
    /// unreachable after retries.
    pub async fn list(&self) -> Result<Vec<CartItem>> {
        match &self.backend {
            Backend::Persistent(b) => b.list().await,
            Backend::Guest(b) => b.list().await,
        }
    }

    /// Add `quantity` of a product variant to the cart. If a line with
    /// the same (product, size, color) already exists, its quantity is
    /// incremented; otherwise a new line is created. The resulting
    /// quantity is capped at [`MAX_LINE_QUANTITY`]. Returns the
    /// resulting line.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a quantity outside 1..=99, `NotFound`
    /// for an unknown product, `BackendUnavailable` if the persistent
    /// backend stays unreachable after retries.
    pub async fn add(
        &self,
        product_id: ProductId,
        quantity: i32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<CartItem> {
        if quantity < 1 {
            return Err(AppError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(AppError::Validation(format!(
                "Quantity must be at most {MAX_LINE_QUANTITY}"
            )));
        }

        let product = with_retry("cart.product_lookup", || async {
            self.state.catalog().get_by_id(product_id).await
        })
        .await
        .map_err(catalog_error)?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let key = LineKey::new(product_id, size, color);

        match &self.backend {
            Backend::Persistent(b) => b.add(&key, quantity, &product).await,
            Backend::Guest(b) => b.add(&key, quantity, &product).await,
        }
    }

    /// Update a line's quantity; quantity <= 0 deletes the line and
    /// reports the deletion.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a quantity above [`MAX_LINE_QUANTITY`],
    /// `NotFound` if the line does not exist or does not belong to the
    /// resolved owner.
    pub async fn set_quantity(&self, line_id: &str, quantity: i32) -> Result<SetQuantityOutcome> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(AppError::Validation(format!(
                "Quantity must be at most {MAX_LINE_QUANTITY}"
            )));
        }

        match &self.backend {
            Backend::Persistent(b) => b.set_quantity(line_id, quantity).await,
            Backend::Guest(b) => b.set_quantity(line_id, quantity).await,
        }
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the line does not exist or does not
    /// belong to the resolved owner.
    pub async fn remove(&self, line_id: &str) -> Result<()> {
        match &self.backend {
            Backend::Persistent(b) => b.remove(line_id).await,
            Backend::Guest(b) => b.remove(line_id).await,
        }
    }

    /// Delete all lines for the resolved owner.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the persistent backend stays
    /// unreachable after retries.
    pub async fn clear(&self) -> Result<()> {
        match &self.backend {
            Backend::Persistent(b) => b.clear().await,
            Backend::Guest(b) => b.clear_all().await,
        }
    }

    /// Sum of quantities across all lines; 0 for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the persistent backend stays
    /// unreachable after retries.
    pub async fn count(&self) -> Result<i64> {
        match &self.backend {
            Backend::Persistent(b) => b.count().await,
            Backend::Guest(b) => b.count().await,
        }
    }

    /// Fold the session's guest cart into a user's persistent cart,
    /// summing quantities per identity key, then drop the guest key.
    ///
    /// Called after login, so the store's backend is the persistent
    /// one. A merge failure is not fatal to the login: the guest cart
    /// is left in place so the next login can retry.
    pub async fn merge_guest_cart(&self) {
        // A guest session has nothing to merge into
        let Backend::Persistent(backend) = &self.backend else {
            return;
        };

        let lines = guest::load(self.session).await;
        if lines.is_empty() {
            return;
        }

        match backend.merge(&lines).await {
            Ok(()) => {
                if let Err(e) = guest::clear(self.session).await {
                    tracing::warn!(error = %e, "Merged guest cart but failed to clear session copy");
                }
                tracing::info!(
                    user_id = %backend.user_id(),
                    lines = lines.len(),
                    "Merged guest cart"
                );
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %backend.user_id(),
                    error = %e,
                    "Failed to merge guest cart, keeping session copy for retry"
                );
            }
        }
    }
}

fn line_not_found() -> AppError {
    AppError::NotFound("Cart item not found".to_string())
}

/// Map catalog-read errors inside cart operations: transient
/// connectivity failures become `BackendUnavailable` (503), anything
/// else is an internal database error.
fn catalog_error(e: RepositoryError) -> AppError {
    if e.is_transient() {
        return AppError::BackendUnavailable;
    }
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_maps_transient_to_unavailable() {
        assert!(matches!(
            catalog_error(RepositoryError::Database(sqlx::Error::PoolTimedOut)),
            AppError::BackendUnavailable
        ));
        assert!(matches!(
            catalog_error(RepositoryError::DataCorruption("bad".to_string())),
            AppError::Database(_)
        ));
    }
}
