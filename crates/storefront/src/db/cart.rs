//! Cart line repository (persistent backend).
//!
//! Rows are keyed by (user, product, size, color) with a `UNIQUE`
//! constraint; size and color are stored as `''` when absent so the
//! constraint covers option-less lines. Every query carries the owner's
//! `user_id` predicate, so one owner can never read or mutate another
//! owner's lines even with a guessed line ID.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use trailhead_core::{CartLineId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartItem, GuestLine, LineKey, MAX_LINE_QUANTITY};

/// A cart line joined with its product for enrichment.
#[derive(Debug, FromRow)]
struct EnrichedLineRow {
    id: CartLineId,
    product_id: ProductId,
    name: String,
    price: Decimal,
    quantity: i32,
    size: String,
    color: String,
}

impl From<EnrichedLineRow> for CartItem {
    fn from(row: EnrichedLineRow) -> Self {
        Self {
            id: row.id.to_string(),
            product_id: row.product_id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            size: none_if_empty(row.size),
            color: none_if_empty(row.color),
        }
    }
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Repository for persistent cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the owner's lines, most recently created first, enriched
    /// with current product name and price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, EnrichedLineRow>(
            r"
            SELECT cl.id, cl.product_id, p.name, p.price, cl.quantity, cl.size, cl.color
            FROM storefront.cart_line cl
            JOIN storefront.product p ON p.id = cl.product_id
            WHERE cl.user_id = $1
            ORDER BY cl.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    /// Add a quantity to the owner's line for the given key, creating
    /// the line if it does not exist. The resulting quantity is capped
    /// at [`MAX_LINE_QUANTITY`].
    ///
    /// The add-or-increment is a single conditional write, so two
    /// concurrent adds for the same key cannot lose an update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_line(
        &self,
        user_id: UserId,
        key: &LineKey,
        quantity: i32,
    ) -> Result<(CartLineId, i32), RepositoryError> {
        let row: (CartLineId, i32) = sqlx::query_as(
            r"
            INSERT INTO storefront.cart_line (user_id, product_id, size, color, quantity)
            VALUES ($1, $2, $3, $4, LEAST($5, $6))
            ON CONFLICT (user_id, product_id, size, color)
            DO UPDATE SET quantity = LEAST(cart_line.quantity + EXCLUDED.quantity, $6),
                          updated_at = now()
            RETURNING id, quantity
            ",
        )
        .bind(user_id)
        .bind(key.product_id)
        .bind(key.size_column())
        .bind(key.color_column())
        .bind(quantity)
        .bind(MAX_LINE_QUANTITY)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Update a line's quantity in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist
    /// or does not belong to the given owner.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, EnrichedLineRow>(
            r"
            UPDATE storefront.cart_line cl
            SET quantity = $3, updated_at = now()
            FROM storefront.product p
            WHERE cl.id = $1 AND cl.user_id = $2 AND p.id = cl.product_id
            RETURNING cl.id, cl.product_id, p.name, p.price, cl.quantity, cl.size, cl.color
            ",
        )
        .bind(line_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        row.map(CartItem::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a line. Returns `false` if the line was absent or owned
    /// by someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_line(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM storefront.cart_line WHERE id = $1 AND user_id = $2")
                .bind(line_id)
                .bind(user_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all of the owner's lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM storefront.cart_line WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Sum of quantities across the owner's lines; 0 for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0) FROM storefront.cart_line WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Merge guest lines into the owner's persistent cart, summing
    /// quantities per (product, size, color) identity key.
    ///
    /// Runs in one transaction: either the whole guest cart lands or
    /// none of it does, so a failed merge can be retried on the next
    /// login without double-counting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any write fails.
    pub async fn merge_lines(
        &self,
        user_id: UserId,
        lines: &[GuestLine],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for line in lines {
            if line.quantity <= 0 {
                continue;
            }
            let key = line.key();
            sqlx::query(
                r"
                INSERT INTO storefront.cart_line (user_id, product_id, size, color, quantity)
                VALUES ($1, $2, $3, $4, LEAST($5, $6))
                ON CONFLICT (user_id, product_id, size, color)
                DO UPDATE SET quantity = LEAST(cart_line.quantity + EXCLUDED.quantity, $6),
                              updated_at = now()
                ",
            )
            .bind(user_id)
            .bind(key.product_id)
            .bind(key.size_column())
            .bind(key.color_column())
            .bind(line.quantity)
            .bind(MAX_LINE_QUANTITY)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
