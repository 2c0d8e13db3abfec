//! Error types for pagewise.
//!
//! Paging errors are raised by the [`Paginator`](crate::Paginator) itself.
//! Upstream errors wrap whatever a data source reported with the operation
//! that failed, so the underlying failure stays reachable through
//! [`std::error::Error::source`].

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error reported by a concrete data source.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias using `PagerError`.
pub type Result<T> = std::result::Result<T, PagerError>;

/// Main error type for all pagewise operations.
#[derive(Debug, Error)]
pub enum PagerError {
    // ═══════════════════════════════════════════════════════════════════════════
    // PAGING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Page numbers start at 1.
    #[error("Invalid page number: {0}")]
    InvalidPageNumber(i64),

    /// Requested page lies past the last page.
    #[error("Invalid page: {page} total pages: {total_pages}")]
    PageOutOfRange {
        /// Page that was requested.
        page: u64,
        /// Pages available for the current count.
        total_pages: u64,
    },

    /// A paginator cannot be built with a zero page size.
    #[error("Invalid page size: must be greater than zero")]
    InvalidPageSize,

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// The provider failed to count items.
    #[error("{context}")]
    UpstreamCount {
        /// Layer that made the call.
        context: &'static str,
        /// Error returned by the provider.
        source: Box<PagerError>,
    },

    /// The provider failed to fetch a window.
    #[error("{context} (offset {offset}, limit {limit})")]
    UpstreamQuery {
        /// Layer that made the call.
        context: &'static str,
        /// Window offset that was requested.
        offset: u64,
        /// Window limit that was requested.
        limit: u64,
        /// Error returned by the provider.
        source: Box<PagerError>,
    },

    /// Error reported by a concrete data source.
    #[error("data source")]
    Source(#[source] BoxError),
}

impl PagerError {
    /// Wraps a data source failure.
    pub fn source_error(err: impl Into<BoxError>) -> Self {
        PagerError::Source(err.into())
    }

    /// Wraps a failed count call made by the paginator.
    pub fn upstream_count(err: PagerError) -> Self {
        PagerError::UpstreamCount {
            context: "query count",
            source: Box::new(err),
        }
    }

    /// Wraps a failed count call made by a caching layer.
    pub fn cached_count(err: PagerError) -> Self {
        PagerError::UpstreamCount {
            context: "cached count",
            source: Box::new(err),
        }
    }

    /// Wraps a failed query call for the `(offset, limit)` window.
    pub fn upstream_query(offset: u64, limit: u64, err: PagerError) -> Self {
        PagerError::UpstreamQuery {
            context: "query data",
            offset,
            limit,
            source: Box::new(err),
        }
    }

    /// Wraps a failed query call made by a caching layer.
    pub fn cached_query(offset: u64, limit: u64, err: PagerError) -> Self {
        PagerError::UpstreamQuery {
            context: "cached query",
            offset,
            limit,
            source: Box::new(err),
        }
    }

    /// Returns true if this error came from the provider rather than the paginator.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PagerError::UpstreamCount { .. }
                | PagerError::UpstreamQuery { .. }
                | PagerError::Source(_)
        )
    }

    /// Returns the innermost error in the source chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}
