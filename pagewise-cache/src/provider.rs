//! Caching decorator for query providers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use pagewise_core::error::{PagerError, Result};
use pagewise_core::traits::QueryProvider;

use crate::cell::TtlCell;
use crate::config::CacheConfig;
use crate::map::TtlMap;
use crate::metrics::{CacheMetrics, NoopMetrics};

/// Cache key for one `(offset, limit)` window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Window offset
    pub offset: u64,
    /// Window limit
    pub limit: u64,
}

impl QueryKey {
    /// Creates the key for a window.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.offset, self.limit)
    }
}

/// Read-through cache in front of another [`QueryProvider`].
///
/// # Locking
///
/// The count and the query windows sit behind independent locks, so a count
/// never waits on a query and vice versa.
///
/// - Count: a miss takes the exclusive lock and checks again before going
///   upstream, and holds that lock across the upstream call. Callers that
///   raced on the same miss wait and then read the refreshed value, so there
///   is at most one upstream count per expiry window.
/// - Query: a miss goes upstream without holding any lock and stores the
///   result afterwards. Concurrent misses on the same window each call
///   upstream.
///
/// Upstream errors are returned with call context and never cached.
pub struct CachedProvider<T, P> {
    upstream: P,
    count: tokio::sync::RwLock<TtlCell<u64>>,
    query: RwLock<TtlMap<QueryKey, Vec<T>>>,
    metrics: Arc<dyn CacheMetrics>,
    config: CacheConfig,
}

impl<T, P> CachedProvider<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: QueryProvider<T>,
{
    /// Wraps `upstream` with the default 30 second TTLs.
    pub fn new(upstream: P) -> Self {
        Self::with_config(upstream, CacheConfig::default())
    }

    /// Wraps `upstream` with custom TTLs.
    pub fn with_config(upstream: P, config: CacheConfig) -> Self {
        Self {
            upstream,
            count: tokio::sync::RwLock::new(TtlCell::new(config.count_ttl())),
            query: RwLock::new(TtlMap::new(config.query_ttl())),
            metrics: Arc::new(NoopMetrics),
            config,
        }
    }

    /// Replaces the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the wrapped provider.
    pub fn upstream(&self) -> &P {
        &self.upstream
    }

    /// Returns the TTL configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the count and whether it came from the cache.
    async fn count_value_and_update_cache(&self) -> Result<(u64, bool)> {
        let cached = self.count.read().await.value().copied();
        if let Some(count) = cached {
            return Ok((count, true));
        }

        let mut cell = self.count.write().await;

        // Another caller may have refreshed the cell while we waited.
        if let Some(count) = cell.value().copied() {
            return Ok((count, true));
        }

        let count = self
            .upstream
            .count()
            .await
            .map_err(PagerError::cached_count)?;
        cell.set_value(count);

        Ok((count, false))
    }

    /// Returns the window and whether it came from the cache.
    async fn query_value_and_update_cache(&self, key: QueryKey) -> Result<(Vec<T>, bool)> {
        let cached = self.query.read().value(&key).cloned();
        if let Some(items) = cached {
            return Ok((items, true));
        }

        let items = self
            .upstream
            .query(key.offset, key.limit)
            .await
            .map_err(|e| PagerError::cached_query(key.offset, key.limit, e))?;

        self.query.write().set_value(key, items.clone());

        Ok((items, false))
    }
}

#[async_trait]
impl<T, P> QueryProvider<T> for CachedProvider<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: QueryProvider<T>,
{
    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64> {
        let (count, cached) = self.count_value_and_update_cache().await?;
        self.metrics.count_increment(cached);

        debug!(count, cached, "Count");
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn query(&self, offset: u64, limit: u64) -> Result<Vec<T>> {
        let key = QueryKey::new(offset, limit);
        let (items, cached) = self.query_value_and_update_cache(key).await?;
        self.metrics.query_increment(cached);

        debug!(%key, returned = items.len(), cached, "Query");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::future::join_all;

    use crate::metrics::{CounterMetrics, MetricsSnapshot};

    const TTL: Duration = Duration::from_secs(30);

    /// Upstream over `1..=len` that counts calls and can fail or stall.
    #[derive(Default)]
    struct Scripted {
        len: u64,
        delay: Duration,
        count_calls: AtomicUsize,
        query_calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl Scripted {
        fn new(len: u64) -> Self {
            Self {
                len,
                ..Default::default()
            }
        }

        fn with_delay(len: u64, delay: Duration) -> Self {
            Self {
                len,
                delay,
                ..Default::default()
            }
        }

        fn count_calls(&self) -> usize {
            self.count_calls.load(Ordering::SeqCst)
        }

        fn query_calls(&self) -> usize {
            self.query_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueryProvider<u64> for Scripted {
        async fn count(&self) -> Result<u64> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(PagerError::source_error("connection refused"));
            }
            Ok(self.len)
        }

        async fn query(&self, offset: u64, limit: u64) -> Result<Vec<u64>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(PagerError::source_error("connection refused"));
            }
            let end = (offset + limit).min(self.len);
            Ok((offset..end).map(|i| i + 1).collect())
        }
    }

    fn cached(
        upstream: Scripted,
        count_ttl: Duration,
        query_ttl: Duration,
    ) -> CachedProvider<u64, Scripted> {
        let config = CacheConfig::default()
            .with_count_ttl(count_ttl)
            .with_query_ttl(query_ttl);
        CachedProvider::with_config(upstream, config)
    }

    #[test]
    fn test_query_key_display_is_unambiguous() {
        assert_eq!(QueryKey::new(1, 23).to_string(), "1_23");
        assert_ne!(QueryKey::new(1, 23), QueryKey::new(12, 3));
        assert_ne!(QueryKey::new(1, 23).to_string(), QueryKey::new(12, 3).to_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_cached_within_ttl() {
        let provider = cached(Scripted::new(101), TTL, TTL);

        assert_eq!(provider.count().await.unwrap(), 101);
        assert_eq!(provider.count().await.unwrap(), 101);
        assert_eq!(provider.upstream().count_calls(), 1);

        tokio::time::advance(TTL + Duration::from_millis(1)).await;

        assert_eq!(provider.count().await.unwrap(), 101);
        assert_eq!(provider.upstream().count_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_ttl_zero_always_goes_upstream() {
        let provider = cached(Scripted::new(5), Duration::ZERO, TTL);

        for _ in 0..3 {
            provider.count().await.unwrap();
        }
        assert_eq!(provider.upstream().count_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_cached_per_window() {
        let provider = cached(Scripted::new(101), TTL, TTL);

        assert_eq!(provider.query(0, 3).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(provider.query(0, 3).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(provider.upstream().query_calls(), 1);

        assert_eq!(provider.query(3, 3).await.unwrap(), vec![4, 5, 6]);
        assert_eq!(provider.upstream().query_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_windows_expire_together() {
        let provider = cached(Scripted::new(101), TTL, TTL);

        provider.query(0, 10).await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;
        provider.query(10, 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        provider.query(10, 10).await.unwrap();
        assert_eq!(provider.upstream().query_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_error_not_cached() {
        let provider = cached(Scripted::new(101), TTL, TTL);
        provider.upstream().fail.store(true, Ordering::SeqCst);

        let err = provider.count().await.unwrap_err();
        assert!(matches!(
            err,
            PagerError::UpstreamCount {
                context: "cached count",
                ..
            }
        ));
        assert_eq!(err.root_cause().to_string(), "connection refused");

        provider.upstream().fail.store(false, Ordering::SeqCst);
        assert_eq!(provider.count().await.unwrap(), 101);
        assert_eq!(provider.upstream().count_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_error_not_cached() {
        let provider = cached(Scripted::new(101), TTL, TTL);
        provider.upstream().fail.store(true, Ordering::SeqCst);

        let err = provider.query(0, 10).await.unwrap_err();
        assert!(matches!(
            err,
            PagerError::UpstreamQuery {
                context: "cached query",
                offset: 0,
                limit: 10,
                ..
            }
        ));

        provider.upstream().fail.store(false, Ordering::SeqCst);
        assert_eq!(provider.query(0, 10).await.unwrap().len(), 10);
        assert_eq!(provider.upstream().query_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_record_hits_and_misses() {
        let metrics = Arc::new(CounterMetrics::new());
        let provider = cached(Scripted::new(101), TTL, TTL).with_metrics(metrics.clone());

        provider.count().await.unwrap();
        provider.count().await.unwrap();
        provider.query(0, 10).await.unwrap();
        provider.query(0, 10).await.unwrap();
        provider.query(10, 10).await.unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.count_total, 2);
        assert_eq!(snapshot.count_hits, 1);
        assert_eq!(snapshot.query_total, 3);
        assert_eq!(snapshot.query_hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_counted() {
        let metrics = Arc::new(CounterMetrics::new());
        let provider = cached(Scripted::new(101), TTL, TTL).with_metrics(metrics.clone());
        provider.upstream().fail.store(true, Ordering::SeqCst);

        assert!(provider.count().await.is_err());
        assert!(provider.query(0, 10).await.is_err());

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_count_misses_collapse() {
        let metrics = Arc::new(CounterMetrics::new());
        let provider = cached(Scripted::with_delay(101, Duration::from_millis(50)), TTL, TTL)
            .with_metrics(metrics.clone());

        let results = join_all((0..10).map(|_| provider.count())).await;

        assert!(results.iter().all(|r| matches!(r, Ok(101))));
        assert_eq!(provider.upstream().count_calls(), 1);
        assert_eq!(metrics.snapshot().count_hits, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_query_misses_each_go_upstream() {
        let provider = cached(Scripted::with_delay(101, Duration::from_millis(50)), TTL, TTL);

        let results = join_all((0..10).map(|_| provider.query(0, 10))).await;

        assert!(results.iter().all(|r| r.as_ref().map(Vec::len).ok() == Some(10)));
        assert_eq!(provider.upstream().query_calls(), 10);

        provider.query(0, 10).await.unwrap();
        assert_eq!(provider.upstream().query_calls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_does_not_block_query() {
        let provider = Arc::new(cached(
            Scripted::with_delay(101, Duration::from_secs(10)),
            TTL,
            TTL,
        ));

        let slow_count = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.count().await })
        };
        tokio::task::yield_now().await;

        let query = tokio::time::timeout(Duration::from_secs(11), provider.query(0, 10)).await;
        assert!(query.is_ok());
        assert_eq!(slow_count.await.unwrap().unwrap(), 101);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_count_stores_nothing() {
        let provider = cached(Scripted::with_delay(101, Duration::from_secs(10)), TTL, TTL);

        let timed_out = tokio::time::timeout(Duration::from_secs(1), provider.count()).await;
        assert!(timed_out.is_err());

        assert_eq!(provider.count().await.unwrap(), 101);
        assert_eq!(provider.upstream().count_calls(), 2);
    }
}
