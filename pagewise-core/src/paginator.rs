//! Page arithmetic over a [`QueryProvider`].

use std::marker::PhantomData;

use tracing::{debug, instrument};

use crate::error::{PagerError, Result};
use crate::traits::QueryProvider;
use crate::types::Page;

/// Turns page numbers into offset/limit windows against a provider.
///
/// The paginator holds no mutable state: every call to [`Paginator::page`]
/// is one count round-trip followed by at most one query round-trip. Wrap
/// the provider in a caching decorator to avoid repeating them.
pub struct Paginator<T, P> {
    provider: P,
    page_size: u64,
    _item: PhantomData<fn() -> T>,
}

impl<T, P> Paginator<T, P>
where
    T: Send + 'static,
    P: QueryProvider<T>,
{
    /// Creates a paginator with a fixed page size.
    ///
    /// Returns `InvalidPageSize` when `page_size` is zero.
    pub fn new(provider: P, page_size: u64) -> Result<Self> {
        if page_size == 0 {
            return Err(PagerError::InvalidPageSize);
        }

        Ok(Self {
            provider,
            page_size,
            _item: PhantomData,
        })
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Number of pages needed for `count` items.
    pub fn total_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.page_size)
    }

    /// Fetches page `page_number` (1-based).
    ///
    /// # Errors
    ///
    /// - `InvalidPageNumber` if `page_number <= 0`; the provider is not called
    /// - `UpstreamCount` / `UpstreamQuery` if the provider fails
    /// - `PageOutOfRange` if `page_number` is past the last page
    ///
    /// An empty source is not an error: it yields `Page::default()`.
    #[instrument(skip(self), fields(page_size = self.page_size))]
    pub async fn page(&self, page_number: i64) -> Result<Page<T>> {
        if page_number <= 0 {
            return Err(PagerError::InvalidPageNumber(page_number));
        }
        let page_number = page_number as u64;

        let count = self
            .provider
            .count()
            .await
            .map_err(PagerError::upstream_count)?;

        if count == 0 {
            debug!("Empty source");
            return Ok(Page::default());
        }

        let total_pages = self.total_pages(count);
        if page_number > total_pages {
            return Err(PagerError::PageOutOfRange {
                page: page_number,
                total_pages,
            });
        }

        let offset = self.page_size * (page_number - 1);
        let items = self
            .provider
            .query(offset, self.page_size)
            .await
            .map_err(|e| PagerError::upstream_query(offset, self.page_size, e))?;

        debug!(offset, returned = items.len(), total_pages, "Fetched page");

        let bottom_index = offset + 1;
        let top_index = offset + items.len() as u64;

        Ok(Page {
            items,
            bottom_index,
            top_index,
            page_size: self.page_size,
            page_number,
            total_pages,
        })
    }
}
