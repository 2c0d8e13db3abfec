//! Hit/miss counters for the cached provider.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Sink for cache hit and miss events.
///
/// Called once per successful `count` or `query` on a
/// [`CachedProvider`](crate::CachedProvider), with `cached` set when the
/// value came from the cache.
pub trait CacheMetrics: Send + Sync {
    /// Records one count call.
    fn count_increment(&self, cached: bool);

    /// Records one query call.
    fn query_increment(&self, cached: bool);
}

/// Metrics sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    fn count_increment(&self, _cached: bool) {}

    fn query_increment(&self, _cached: bool) {}
}

/// In-process counters for count and query calls.
#[derive(Debug, Default)]
pub struct CounterMetrics {
    count_total: AtomicU64,
    count_hits: AtomicU64,
    query_total: AtomicU64,
    query_hits: AtomicU64,
}

impl CounterMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            count_total: self.count_total.load(Ordering::Relaxed),
            count_hits: self.count_hits.load(Ordering::Relaxed),
            query_total: self.query_total.load(Ordering::Relaxed),
            query_hits: self.query_hits.load(Ordering::Relaxed),
        }
    }
}

impl CacheMetrics for CounterMetrics {
    fn count_increment(&self, cached: bool) {
        self.count_total.fetch_add(1, Ordering::Relaxed);
        if cached {
            self.count_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn query_increment(&self, cached: bool) {
        self.query_total.fetch_add(1, Ordering::Relaxed);
        if cached {
            self.query_hits.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Counter values at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Count calls answered
    pub count_total: u64,
    /// Count calls answered from cache
    pub count_hits: u64,
    /// Query calls answered
    pub query_total: u64,
    /// Query calls answered from cache
    pub query_hits: u64,
}

impl MetricsSnapshot {
    /// Fraction of count calls served from cache, 0.0 when there were none.
    pub fn count_hit_ratio(&self) -> f64 {
        ratio(self.count_hits, self.count_total)
    }

    /// Fraction of query calls served from cache, 0.0 when there were none.
    pub fn query_hit_ratio(&self) -> f64 {
        ratio(self.query_hits, self.query_total)
    }
}

fn ratio(hits: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
