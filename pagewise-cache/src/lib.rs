//! TTL cache for pagewise query providers.
//!
//! [`CachedProvider`] wraps any [`QueryProvider`](pagewise_core::QueryProvider)
//! and memoizes the total count and individual query windows. It implements
//! the same trait, so a [`Paginator`](pagewise_core::Paginator) cannot tell
//! the difference.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cell;
mod config;
mod map;
mod metrics;
mod provider;

pub use cell::TtlCell;
pub use config::CacheConfig;
pub use map::TtlMap;
pub use metrics::{CacheMetrics, CounterMetrics, MetricsSnapshot, NoopMetrics};
pub use provider::{CachedProvider, QueryKey};
