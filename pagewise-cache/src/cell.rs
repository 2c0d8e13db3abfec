//! Single value with an expiry clock.

use std::time::Duration;

use tokio::time::Instant;

/// A value that stays valid for `ttl` after it was last set.
///
/// A zero TTL disables the cell: writes are dropped and every read misses.
#[derive(Debug)]
pub struct TtlCell<V> {
    value: Option<V>,
    ttl: Duration,
    last_set_at: Option<Instant>,
}

impl<V> TtlCell<V> {
    /// Creates an empty cell.
    pub fn new(ttl: Duration) -> Self {
        Self {
            value: None,
            ttl,
            last_set_at: None,
        }
    }

    /// Returns the value if it was set no more than `ttl` ago.
    pub fn value(&self) -> Option<&V> {
        if self.is_disabled() {
            return None;
        }

        match self.last_set_at {
            Some(at) if at.elapsed() <= self.ttl => self.value.as_ref(),
            _ => None,
        }
    }

    /// Stores `value` and restarts the expiry clock.
    pub fn set_value(&mut self, value: V) {
        if self.is_disabled() {
            return;
        }

        self.value = Some(value);
        self.last_set_at = Some(Instant::now());
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true if caching is turned off for this cell.
    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }
}
