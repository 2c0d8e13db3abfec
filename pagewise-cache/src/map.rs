//! Keyed values sharing one expiry clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

/// A map whose entries all expire together.
///
/// There is one `last_touch_at` for the whole map, not one per key. A write
/// only re-arms it once the previous window has run out, so every key
/// written inside one window shares that window's deadline. Expired entries
/// are not purged: once a later write re-arms the clock, keys from earlier
/// windows read as valid again.
///
/// A zero TTL disables the map: writes are dropped and every read misses.
#[derive(Debug)]
pub struct TtlMap<K, V> {
    entries: HashMap<K, V>,
    ttl: Duration,
    last_touch_at: Option<Instant>,
}

impl<K, V> TtlMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            last_touch_at: None,
        }
    }

    /// Returns the entry for `key` if the map-wide window is still open.
    ///
    /// An absent key and an expired map both return `None`.
    pub fn value(&self, key: &K) -> Option<&V> {
        if self.ttl.is_zero() || self.window_elapsed() {
            return None;
        }

        self.entries.get(key)
    }

    /// Inserts or overwrites `key`, re-arming the clock if the window has elapsed.
    pub fn set_value(&mut self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }

        self.entries.insert(key, value);

        if self.window_elapsed() {
            self.last_touch_at = Some(Instant::now());
        }
    }

    fn window_elapsed(&self) -> bool {
        match self.last_touch_at {
            Some(at) => at.elapsed() > self.ttl,
            None => true,
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
