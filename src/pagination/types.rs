//! Pagination types and traits
//!
//! Parameters accepted by the paginators and the page DTOs they produce.

use crate::error::Result;
use crate::guard;
use crate::query::{AsyncQueryable, Queryable};
use crate::types::{CursorKey, SortOrder};
use async_trait::async_trait;
use serde::{Serialize, Serializer};

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ============================================================================
// Parameters
// ============================================================================

/// Parameters for page-number pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Create page parameters
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Check that both page and page size are positive
    pub fn validate(&self) -> Result<()> {
        guard::greater_than_zero(self.page, "page")?;
        guard::greater_than_zero(self.page_size, "page_size")
    }

    /// Number of items preceding this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Parameters for cursor pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorParams<K> {
    /// Number of items per page
    pub page_size: u32,
    /// Key to resume after; `None` starts from the first item in `order`
    pub cursor: Option<K>,
    /// Direction of traversal
    pub order: SortOrder,
}

impl<K> Default for CursorParams<K> {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
            order: SortOrder::Ascending,
        }
    }
}

impl<K: CursorKey> CursorParams<K> {
    /// Parameters for the first page
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Resume after the given cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: K) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Set the traversal direction
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Check that the page size is positive
    pub fn validate(&self) -> Result<()> {
        guard::greater_than_zero(self.page_size, "page_size")
    }

    /// Parameters for the page following `page`, if there is one
    pub fn next_for<T>(&self, page: &CursorPage<T, K>) -> Option<Self> {
        match (&page.next_cursor, page.has_more) {
            (Some(next), true) => Some(self.clone().with_cursor(next.clone())),
            _ => None,
        }
    }
}

// ============================================================================
// Paginator Traits
// ============================================================================

/// A pagination strategy over deferred queries
///
/// Paginators validate their parameters before touching the query and
/// materialize at most once per call.
pub trait Paginator<T, Q: Queryable<T>> {
    /// Parameters selecting a page
    type Params;
    /// Page produced
    type Output;

    /// Fetch one page of `query`
    fn paginate(&self, query: Q, params: &Self::Params) -> Result<Self::Output>;
}

/// A pagination strategy over queries that materialize asynchronously
#[async_trait]
pub trait AsyncPaginator<T, Q>: Send + Sync
where
    T: Send + 'static,
    Q: AsyncQueryable<T> + 'static,
{
    /// Parameters selecting a page
    type Params: Sync;
    /// Page produced
    type Output: Send;

    /// Fetch one page of `query`
    async fn paginate_async(&self, query: Q, params: &Self::Params) -> Result<Self::Output>;
}

// ============================================================================
// Result Traits
// ============================================================================

/// Common view over every page type
pub trait PaginationResult<T> {
    /// Items on this page
    fn items(&self) -> &[T];

    /// Requested page size
    fn page_size(&self) -> u32;

    /// Take ownership of the items
    fn into_items(self) -> Vec<T>;
}

/// Page produced by page-number pagination
pub trait PagedResult<T>: PaginationResult<T> {
    /// 1-based page number
    fn page(&self) -> u32;

    /// Total number of items, when known
    fn total_items(&self) -> Option<u64>;
}

/// Total number of pages needed for `total_items` items
pub fn total_pages(total_items: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size))
}

// ============================================================================
// Page DTOs
// ============================================================================

/// Page from offset pagination, without totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: Option<u64>,
}

impl<T> Page<T> {
    /// Convert every item, keeping the pagination metadata
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
        }
    }
}

impl<T> PaginationResult<T> for Page<T> {
    fn items(&self) -> &[T] {
        &self.items
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> PagedResult<T> for Page<T> {
    fn page(&self) -> u32 {
        self.page
    }

    fn total_items(&self) -> Option<u64> {
        self.total_items
    }
}

/// Page from size-aware pagination, with item and page totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizedPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> SizedPage<T> {
    /// Convert every item, keeping the pagination metadata
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> SizedPage<U> {
        SizedPage {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    /// Check if a later page exists
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    /// Check if an earlier page exists
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

impl<T> PaginationResult<T> for SizedPage<T> {
    fn items(&self) -> &[T] {
        &self.items
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> PagedResult<T> for SizedPage<T> {
    fn page(&self) -> u32 {
        self.page
    }

    fn total_items(&self) -> Option<u64> {
        Some(self.total_items)
    }
}

/// Page from cursor pagination
///
/// `next_cursor` is set exactly when `has_more` is, and holds the key of the
/// last item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "T: Serialize, K: CursorKey"))]
pub struct CursorPage<T, K> {
    pub items: Vec<T>,
    #[serde(serialize_with = "serialize_cursor")]
    pub current_cursor: Option<K>,
    #[serde(serialize_with = "serialize_cursor")]
    pub next_cursor: Option<K>,
    pub has_more: bool,
    pub page_size: u32,
}

impl<T, K> CursorPage<T, K> {
    /// Convert every item, keeping the cursors
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U, K> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            current_cursor: self.current_cursor,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
            page_size: self.page_size,
        }
    }
}

impl<T, K> PaginationResult<T> for CursorPage<T, K> {
    fn items(&self) -> &[T] {
        &self.items
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

fn serialize_cursor<K: CursorKey, S: Serializer>(
    cursor: &Option<K>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    cursor
        .as_ref()
        .map(CursorKey::to_key_value)
        .serialize(serializer)
}
