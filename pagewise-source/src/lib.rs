//! # pagewise sources
//!
//! Ready-made [`QueryProvider`](pagewise_core::QueryProvider) implementations.
//!
//! - **Slice**: an owned, ordered `Vec<T>`, for development, testing, and
//!   data that already lives in memory
//!
//! ## Example
//!
//! ```rust,ignore
//! use pagewise_source::SliceProvider;
//!
//! let provider = SliceProvider::new((1..=101).collect::<Vec<u32>>());
//! let window = provider.query(100, 10).await?; // clamped to [101]
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod slice;

pub use slice::SliceProvider;
