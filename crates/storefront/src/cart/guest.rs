//! Guest cart backend (session-local storage).
//!
//! Anonymous carts are a serialized line list stored under one fixed
//! session key. Mutations are pure functions over the full snapshot;
//! the backend writes the whole list back, so concurrent writes within
//! a session are last-write-wins.

use tower_sessions::Session;

use crate::db::with_retry;
use crate::error::{AppError, Result};
use crate::models::{CartItem, GuestLine, LineKey, MAX_LINE_QUANTITY, Product, session_keys};
use crate::state::AppState;

use super::{SetQuantityOutcome, catalog_error, line_not_found};

/// Cart backend for anonymous visitors, writing to the session.
pub struct GuestBackend<'a> {
    state: &'a AppState,
    session: &'a Session,
}

impl<'a> GuestBackend<'a> {
    /// Create a backend over the current session.
    #[must_use]
    pub const fn new(state: &'a AppState, session: &'a Session) -> Self {
        Self { state, session }
    }

    /// Enriched lines in insertion order. Lines whose product has
    /// disappeared from the catalog are dropped with a warning.
    pub async fn list(&self) -> Result<Vec<CartItem>> {
        let lines = load(self.session).await;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let product = with_retry("cart.enrich", || async {
                self.state.catalog().get_by_id(line.product_id).await
            })
            .await
            .map_err(catalog_error)?;

            match product {
                Some(product) => items.push(enrich_line(&line, &product)),
                None => {
                    tracing::warn!(product_id = %line.product_id, "Guest cart references unknown product, skipping");
                }
            }
        }
        Ok(items)
    }

    /// Add-or-increment against the snapshot; returns the line.
    pub async fn add(&self, key: &LineKey, quantity: i32, product: &Product) -> Result<CartItem> {
        let mut lines = load(self.session).await;
        let line = add_line(&mut lines, key, quantity);
        store(self.session, &lines).await.map_err(session_error)?;

        Ok(enrich_line(&line, product))
    }

    /// Update a line's quantity; quantity <= 0 deletes it.
    pub async fn set_quantity(&self, line_id: &str, quantity: i32) -> Result<SetQuantityOutcome> {
        let mut lines = load(self.session).await;

        match set_line_quantity(&mut lines, line_id, quantity) {
            SetOutcome::Updated(line) => {
                store(self.session, &lines).await.map_err(session_error)?;
                let product = with_retry("cart.enrich", || async {
                    self.state.catalog().get_by_id(line.product_id).await
                })
                .await
                .map_err(catalog_error)?
                .ok_or_else(line_not_found)?;
                Ok(SetQuantityOutcome::Updated(enrich_line(&line, &product)))
            }
            SetOutcome::Deleted => {
                store(self.session, &lines).await.map_err(session_error)?;
                Ok(SetQuantityOutcome::Deleted)
            }
            SetOutcome::NotFound => Err(line_not_found()),
        }
    }

    /// Remove a line; `NotFound` when absent.
    pub async fn remove(&self, line_id: &str) -> Result<()> {
        let mut lines = load(self.session).await;
        if !remove_line(&mut lines, line_id) {
            return Err(line_not_found());
        }
        store(self.session, &lines).await.map_err(session_error)
    }

    /// Drop the guest cart key entirely.
    pub async fn clear_all(&self) -> Result<()> {
        clear(self.session).await.map_err(session_error)
    }

    /// Sum of quantities; 0 for an empty cart.
    pub async fn count(&self) -> Result<i64> {
        Ok(count(&load(self.session).await))
    }
}

fn enrich_line(line: &GuestLine, product: &Product) -> CartItem {
    CartItem {
        id: line.id.clone(),
        product_id: line.product_id,
        name: product.name.clone(),
        price: product.price,
        quantity: line.quantity,
        size: line.size.clone(),
        color: line.color.clone(),
    }
}

fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session write failed: {e}"))
}

/// Outcome of a quantity update against the line list.
#[derive(Debug)]
enum SetOutcome {
    /// The line was updated in place.
    Updated(GuestLine),
    /// The quantity dropped to zero or below and the line was removed.
    Deleted,
    /// No line with that ID exists.
    NotFound,
}

/// Add `quantity` to the line with the given key, creating it if
/// absent. The resulting quantity saturates at [`MAX_LINE_QUANTITY`].
/// Returns the resulting line.
fn add_line(lines: &mut Vec<GuestLine>, key: &LineKey, quantity: i32) -> GuestLine {
    if let Some(existing) = lines.iter_mut().find(|line| line.key() == *key) {
        existing.quantity = existing
            .quantity
            .saturating_add(quantity)
            .min(MAX_LINE_QUANTITY);
        return existing.clone();
    }

    let line = GuestLine::new(key, quantity.min(MAX_LINE_QUANTITY));
    lines.push(line.clone());
    line
}

/// Update a line's quantity; quantity <= 0 removes the line.
fn set_line_quantity(lines: &mut Vec<GuestLine>, line_id: &str, quantity: i32) -> SetOutcome {
    let Some(index) = lines.iter().position(|line| line.id == line_id) else {
        return SetOutcome::NotFound;
    };

    if quantity <= 0 {
        lines.remove(index);
        return SetOutcome::Deleted;
    }

    if let Some(line) = lines.get_mut(index) {
        line.quantity = quantity;
        return SetOutcome::Updated(line.clone());
    }

    SetOutcome::NotFound
}

/// Remove a line by ID. Returns `false` if no such line exists.
fn remove_line(lines: &mut Vec<GuestLine>, line_id: &str) -> bool {
    let before = lines.len();
    lines.retain(|line| line.id != line_id);
    lines.len() < before
}

/// Sum of quantities across all lines.
fn count(lines: &[GuestLine]) -> i64 {
    lines.iter().map(|line| i64::from(line.quantity)).sum()
}

/// Load the guest line list from the session.
///
/// A missing key or a session read error yields an empty cart; the
/// guest backend never hard-fails a read.
pub(super) async fn load(session: &Session) -> Vec<GuestLine> {
    match session.get::<Vec<GuestLine>>(session_keys::GUEST_CART).await {
        Ok(Some(lines)) => lines,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read guest cart, treating as empty");
            Vec::new()
        }
    }
}

/// Write the full guest line list back to the session.
async fn store(
    session: &Session,
    lines: &[GuestLine],
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::GUEST_CART, lines).await
}

/// Remove the guest cart key entirely.
pub(super) async fn clear(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .remove::<Vec<GuestLine>>(session_keys::GUEST_CART)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhead_core::ProductId;

    fn key(product: i32, size: Option<&str>, color: Option<&str>) -> LineKey {
        LineKey::new(
            ProductId::new(product),
            size.map(String::from),
            color.map(String::from),
        )
    }

    #[test]
    fn test_add_same_key_merges_into_one_line() {
        let mut lines = Vec::new();
        add_line(&mut lines, &key(1, Some("M"), Some("Navy")), 2);
        let merged = add_line(&mut lines, &key(1, Some("M"), Some("Navy")), 1);

        assert_eq!(lines.len(), 1);
        assert_eq!(merged.quantity, 3);
    }

    #[test]
    fn test_add_different_variant_is_distinct_line() {
        let mut lines = Vec::new();
        add_line(&mut lines, &key(1, Some("M"), None), 1);
        add_line(&mut lines, &key(1, Some("L"), None), 1);

        assert_eq!(lines.len(), 2);
        assert_eq!(count(&lines), 2);
    }

    #[test]
    fn test_add_saturates_at_max_quantity() {
        let mut lines = Vec::new();
        add_line(&mut lines, &key(1, None, None), i32::MAX);
        let merged = add_line(&mut lines, &key(1, None, None), 1);

        assert_eq!(merged.quantity, MAX_LINE_QUANTITY);
        assert_eq!(count(&lines), i64::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_count_is_sum_of_quantities() {
        let mut lines = Vec::new();
        add_line(&mut lines, &key(1, None, None), 2);
        add_line(&mut lines, &key(2, None, None), 5);

        assert_eq!(count(&lines), 7);
        assert_eq!(count(&[]), 0);
    }

    #[test]
    fn test_set_quantity_zero_deletes_line() {
        let mut lines = Vec::new();
        let line = add_line(&mut lines, &key(3, Some("9"), None), 4);

        assert!(matches!(
            set_line_quantity(&mut lines, &line.id, 0),
            SetOutcome::Deleted
        ));
        assert!(lines.is_empty());
        assert_eq!(count(&lines), 0);
    }

    #[test]
    fn test_set_quantity_negative_deletes_line() {
        let mut lines = Vec::new();
        let line = add_line(&mut lines, &key(3, None, None), 4);

        assert!(matches!(
            set_line_quantity(&mut lines, &line.id, -1),
            SetOutcome::Deleted
        ));
        assert_eq!(count(&lines), 0);
    }

    #[test]
    fn test_set_quantity_updates_in_place() {
        let mut lines = Vec::new();
        let line = add_line(&mut lines, &key(2, Some("32"), Some("Khaki")), 1);

        match set_line_quantity(&mut lines, &line.id, 6) {
            SetOutcome::Updated(updated) => assert_eq!(updated.quantity, 6),
            other => panic!("expected update, got {other:?}"),
        }
        assert_eq!(count(&lines), 6);
    }

    #[test]
    fn test_set_quantity_unknown_id() {
        let mut lines = Vec::new();
        assert!(matches!(
            set_line_quantity(&mut lines, "99--", 1),
            SetOutcome::NotFound
        ));
    }

    #[test]
    fn test_remove_line() {
        let mut lines = Vec::new();
        let line = add_line(&mut lines, &key(5, None, None), 1);

        assert!(remove_line(&mut lines, &line.id));
        assert!(!remove_line(&mut lines, &line.id));
        assert!(lines.is_empty());
    }
}
