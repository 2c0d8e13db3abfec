//! The capability every data source supplies to the paginator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY PROVIDER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for an ordered, countable source of items.
///
/// Implementations might be:
/// - An in-memory slice (for testing/development)
/// - A relational table (count(*) plus OFFSET/LIMIT)
/// - A decorator that caches another provider
///
/// Cancellation follows the future: a caller that drops a pending call or
/// wraps it in `tokio::time::timeout` abandons it, and implementations must
/// not leave partial state behind when that happens.
#[async_trait]
pub trait QueryProvider<T: Send + 'static>: Send + Sync {
    /// Returns the total number of items.
    async fn count(&self) -> Result<u64>;

    /// Returns up to `limit` items starting at `offset`.
    ///
    /// Windows that run past the end of the source are clamped; an offset
    /// beyond the end yields an empty vector.
    async fn query(&self, offset: u64, limit: u64) -> Result<Vec<T>>;
}

#[async_trait]
impl<T, P> QueryProvider<T> for Arc<P>
where
    T: Send + 'static,
    P: QueryProvider<T> + ?Sized,
{
    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }

    async fn query(&self, offset: u64, limit: u64) -> Result<Vec<T>> {
        (**self).query(offset, limit).await
    }
}

#[async_trait]
impl<T, P> QueryProvider<T> for &P
where
    T: Send + 'static,
    P: QueryProvider<T> + ?Sized,
{
    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }

    async fn query(&self, offset: u64, limit: u64) -> Result<Vec<T>> {
        (**self).query(offset, limit).await
    }
}
