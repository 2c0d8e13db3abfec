//! # pagewise core
//!
//! Page types, errors, and the provider capability shared by every pagewise crate.
//!
//! - **Types**: [`Page`], the immutable result of one page request
//! - **Errors**: [`PagerError`] with call-site context for upstream failures
//! - **Traits**: [`QueryProvider`], the `count` / `query` capability a data source supplies
//! - **Paginator**: [`Paginator`], stateless page arithmetic over a provider
//!
//! ## Example
//!
//! ```rust,ignore
//! use pagewise_core::Paginator;
//!
//! let paginator = Paginator::new(provider, 10)?;
//! let page = paginator.page(1).await?;
//! assert_eq!(page.bottom_index, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod error;
pub mod paginator;
pub mod traits;
pub mod types;

pub use error::{BoxError, PagerError, Result};
pub use paginator::Paginator;
pub use traits::QueryProvider;
pub use types::Page;
