//! In-memory provider over an ordered vector.

use async_trait::async_trait;
use tracing::{debug, instrument};

use pagewise_core::error::Result;
use pagewise_core::traits::QueryProvider;

/// Provider backed by an owned `Vec<T>`.
///
/// Windows are clamped to the data: a window that runs past the end returns
/// the remaining items and an offset at or past the end returns nothing.
/// Every query returns a fresh copy of its window.
#[derive(Clone, Debug, Default)]
pub struct SliceProvider<T> {
    data: Vec<T>,
}

impl<T> SliceProvider<T> {
    /// Creates a provider over `data`, in the given order.
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no items.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns all items.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn window(&self, offset: u64, limit: u64) -> &[T] {
        let len = self.data.len();
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
        let end = usize::try_from(offset.saturating_add(limit))
            .unwrap_or(usize::MAX)
            .min(len);
        &self.data[start..end]
    }
}

impl<T> From<Vec<T>> for SliceProvider<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl<T> FromIterator<T> for SliceProvider<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl<T> QueryProvider<T> for SliceProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn count(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    #[instrument(skip(self))]
    async fn query(&self, offset: u64, limit: u64) -> Result<Vec<T>> {
        let window = self.window(offset, limit).to_vec();
        debug!(returned = window.len(), "Sliced window");
        Ok(window)
    }
}
