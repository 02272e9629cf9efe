//! # Solidafy Paginate
//!
//! Offset, size-aware and cursor pagination over lazy query sources.
//!
//! ## Features
//!
//! - **Offset Pages**: Fetch page N without counting the source
//! - **Size-Aware Pages**: Page N together with item and page totals
//! - **Cursor Pages**: Keyset pagination that resumes after the last key seen
//! - **Navigation Links**: Decorate any page with first/previous/next/last URLs
//! - **DuckDB Sources**: Push ordering, filtering and slicing down to SQL
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_paginate::{KeySelector, MemorySource, PaginateExt, Result, SortOrder};
//!
//! fn main() -> Result<()> {
//!     let source = MemorySource::new((1..=50).collect::<Vec<i64>>());
//!     let key = KeySelector::new("id", |n: &i64| *n)?;
//!
//!     let first = source.clone().cursor_paginate(key.clone(), 10, None, SortOrder::Ascending)?;
//!     let second = source.cursor_paginate(key, 10, first.next_cursor, SortOrder::Ascending)?;
//!     assert_eq!(second.items.first(), Some(&11));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Paginators                               │
//! │  Simple → Page    SizeAware → SizedPage    Cursor → CursorPage  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────────┬──────────┴──────────┬──────────────────────┐
//! │      Query        │      Transform      │      Database        │
//! ├───────────────────┼─────────────────────┼──────────────────────┤
//! │ Queryable         │ SimpleUrl           │ DuckDbSource         │
//! │ AsyncQueryable    │ SizeAwareUrl        │ SQL push-down        │
//! │ MemorySource      │ CursorUrl           │ CSV/Parquet/JSON     │
//! └───────────────────┴─────────────────────┴──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Cursor keys and sort order
pub mod types;

/// Argument guards
pub mod guard;

/// Deferred query contract and the in-memory source
pub mod query;

/// Pagination strategies and page types
pub mod pagination;

/// Navigation link decoration
pub mod transform;

/// Pagination defaults loaded from YAML
pub mod config;

/// DuckDB query sources
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, PaginationConfig};
pub use pagination::{
    AsyncPaginator, CursorPage, CursorPaginator, CursorParams, Page, PageParams,
    PaginateAsyncExt, PaginateExt, Paginator, SimplePaginator, SizeAwarePaginator, SizedPage,
};
pub use query::{AsyncQueryable, KeyBound, KeySelector, MemorySource, Queryable};
pub use transform::{
    CursorUrlPage, CursorUrlTransformer, LinkBuilder, ResultTransformer, SimpleUrlTransformer,
    SizeAwareUrlTransformer, TransformExt, UrlExt, UrlPage,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
