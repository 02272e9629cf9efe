//! Pagination module
//!
//! Supports: Offset, Size-Aware Offset, Cursor (keyset)
//!
//! # Overview
//!
//! Every strategy takes a deferred query and returns exactly one page.
//! Offset strategies slice with skip/take; the cursor strategy orders by a
//! key, resumes strictly past the cursor and over-fetches one item to learn
//! whether another page exists without counting.

mod extensions;
mod strategies;
mod types;

pub use extensions::{PaginateAsyncExt, PaginateExt};
pub use strategies::{CursorPaginator, SimplePaginator, SizeAwarePaginator};
pub use types::{
    total_pages, AsyncPaginator, CursorPage, CursorParams, Page, PageParams, PagedResult,
    PaginationResult, Paginator, SizedPage, DEFAULT_PAGE_SIZE,
};

#[cfg(test)]
mod tests;
