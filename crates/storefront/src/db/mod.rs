//! Database operations for storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `product` - Read-only catalog (rows owned by the seed process)
//! - `cart_line` - Persistent carts, keyed by (user, product, size, color)
//! - `user` / `user_password` - Credential authentication
//! - `session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p trailhead-cli -- migrate
//! ```

pub mod cart;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors returned by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether the error is a transient connectivity failure that a
    /// retry may resolve (as opposed to a query or data error).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Database(
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            )
        )
    }
}

/// Number of attempts for retryable persistent-backend operations.
const RETRY_ATTEMPTS: u32 = 3;

/// Base backoff between retry attempts.
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Run a repository operation, retrying transient failures.
///
/// Non-transient errors are returned immediately. After the final
/// attempt the last error is returned unchanged; callers decide how to
/// surface it (the cart store maps transient exhaustion to a 503).
///
/// # Errors
///
/// Returns the last `RepositoryError` once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(op: &str, f: F) -> Result<T, RepositoryError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < RETRY_ATTEMPTS => {
                tracing::warn!(op, attempt, error = %e, "Transient database error, retrying");
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_with_retry_passes_through_success() {
        let result = with_retry("test", || async { Ok::<_, RepositoryError>(5) }).await;
        assert_eq!(result.expect("success"), 5);
    }

    #[tokio::test]
    async fn test_with_retry_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<i32, _>(RepositoryError::NotFound)
        })
        .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<i32, _>(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        })
        .await;
        assert!(matches!(
            result,
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), RETRY_ATTEMPTS);
    }
}
