//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_COUNT_TTL_MS: u64 = 30_000;
const DEFAULT_QUERY_TTL_MS: u64 = 30_000;

/// TTLs for the two caches held by a [`CachedProvider`](crate::CachedProvider).
///
/// A TTL of zero turns the corresponding cache off; every call then goes upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a total count stays valid, in milliseconds
    pub count_ttl_ms: u64,
    /// How long cached query windows stay valid, in milliseconds
    pub query_ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            count_ttl_ms: DEFAULT_COUNT_TTL_MS,
            query_ttl_ms: DEFAULT_QUERY_TTL_MS,
        }
    }
}

impl CacheConfig {
    /// Config with both caches turned off.
    pub fn disabled() -> Self {
        Self {
            count_ttl_ms: 0,
            query_ttl_ms: 0,
        }
    }

    /// Sets the count TTL.
    pub fn with_count_ttl(mut self, ttl: Duration) -> Self {
        self.count_ttl_ms = duration_to_ms(ttl);
        self
    }

    /// Sets the query TTL.
    pub fn with_query_ttl(mut self, ttl: Duration) -> Self {
        self.query_ttl_ms = duration_to_ms(ttl);
        self
    }

    /// Count TTL as a `Duration`.
    pub fn count_ttl(&self) -> Duration {
        Duration::from_millis(self.count_ttl_ms)
    }

    /// Query TTL as a `Duration`.
    pub fn query_ttl(&self) -> Duration {
        Duration::from_millis(self.query_ttl_ms)
    }
}

fn duration_to_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.count_ttl(), Duration::from_secs(30));
        assert_eq!(config.query_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_builders() {
        let config = CacheConfig::disabled().with_query_ttl(Duration::from_secs(60));
        assert!(config.count_ttl().is_zero());
        assert_eq!(config.query_ttl_ms, 60_000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{"count_ttl_ms": 0}"#).unwrap();
        assert_eq!(config.count_ttl_ms, 0);
        assert_eq!(config.query_ttl_ms, DEFAULT_QUERY_TTL_MS);
    }
}
