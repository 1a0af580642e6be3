//! Catalog accessor with a read-through cache.
//!
//! Wraps [`ProductRepository`] behind a short-TTL moka cache. The
//! catalog is read-only from the storefront, so a slightly stale
//! snapshot is acceptable; the TTL bounds staleness.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use trailhead_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::models::Product;

/// How long cached catalog reads are served before refetching.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound on distinct cached queries.
const CACHE_CAPACITY: u64 = 256;

/// Cache key for catalog list queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum ListKey {
    All,
    Category(String),
}

/// Cached catalog accessor.
///
/// Cheaply cloneable; both caches are shared behind the pool handle.
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    products: Cache<ProductId, Option<Arc<Product>>>,
    lists: Cache<ListKey, Arc<Vec<Product>>>,
}

impl CatalogService {
    /// Create a new catalog service over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            products: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
            lists: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Get a product by ID. `None` for unknown IDs (negative lookups
    /// are cached too).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Arc<Product>>, RepositoryError> {
        if let Some(cached) = self.products.get(&id).await {
            return Ok(cached);
        }

        let product = ProductRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .map(Arc::new);
        self.products.insert(id, product.clone()).await;

        Ok(product)
    }

    /// Get all products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_all(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        self.get_list(ListKey::All).await
    }

    /// Get all products in a category, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_category(
        &self,
        category: &str,
    ) -> Result<Arc<Vec<Product>>, RepositoryError> {
        self.get_list(ListKey::Category(category.to_string())).await
    }

    /// Get the first `count` products, matching the home page's
    /// featured selection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_featured(&self, count: usize) -> Result<Vec<Product>, RepositoryError> {
        let all = self.get_all().await?;
        Ok(all.iter().take(count).cloned().collect())
    }

    async fn get_list(&self, key: ListKey) -> Result<Arc<Vec<Product>>, RepositoryError> {
        if let Some(cached) = self.lists.get(&key).await {
            return Ok(cached);
        }

        let repo = ProductRepository::new(&self.pool);
        let products = match &key {
            ListKey::All => repo.get_all().await?,
            ListKey::Category(category) => repo.get_by_category(category).await?,
        };

        let products = Arc::new(products);
        self.lists.insert(key, products.clone()).await;

        Ok(products)
    }
}
