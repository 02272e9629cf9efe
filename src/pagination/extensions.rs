//! Fluent pagination on queries
//!
//! ```ignore
//! let page = source.paginate(2, 25)?;
//! let first = source.cursor_paginate(id_key, 25, None, SortOrder::Ascending)?;
//! ```

use super::strategies::{CursorPaginator, SimplePaginator, SizeAwarePaginator};
use super::types::{
    AsyncPaginator, CursorPage, CursorParams, Page, PageParams, Paginator, SizedPage,
};
use crate::error::Result;
use crate::query::{AsyncQueryable, KeySelector, Queryable};
use crate::types::{CursorKey, SortOrder};
use async_trait::async_trait;

/// Pagination methods available on every query
pub trait PaginateExt<T>: Queryable<T> {
    /// Fetch one page without counting the total
    fn simple_paginate(self, page: u32, page_size: u32) -> Result<Page<T>> {
        Paginator::<T, Self>::paginate(&SimplePaginator, self, &PageParams::new(page, page_size))
    }

    /// Fetch one page together with item and page totals
    fn paginate(self, page: u32, page_size: u32) -> Result<SizedPage<T>> {
        Paginator::<T, Self>::paginate(
            &SizeAwarePaginator,
            self,
            &PageParams::new(page, page_size),
        )
    }

    /// Fetch the page following `cursor` in `order`
    fn cursor_paginate<K: CursorKey>(
        self,
        key: KeySelector<T, K>,
        page_size: u32,
        cursor: Option<K>,
        order: SortOrder,
    ) -> Result<CursorPage<T, K>> {
        let params = CursorParams {
            page_size,
            cursor,
            order,
        };
        Paginator::<T, Self>::paginate(&CursorPaginator::new(key), self, &params)
    }
}

impl<T, Q: Queryable<T>> PaginateExt<T> for Q {}

/// Asynchronous pagination methods available on every async query
#[async_trait]
pub trait PaginateAsyncExt<T: Send + 'static>: AsyncQueryable<T> + 'static {
    /// Fetch one page without counting the total
    async fn simple_paginate_async(self, page: u32, page_size: u32) -> Result<Page<T>> {
        let params = PageParams::new(page, page_size);
        AsyncPaginator::<T, Self>::paginate_async(&SimplePaginator, self, &params).await
    }

    /// Fetch one page together with item and page totals
    async fn paginate_async(self, page: u32, page_size: u32) -> Result<SizedPage<T>> {
        let params = PageParams::new(page, page_size);
        AsyncPaginator::<T, Self>::paginate_async(&SizeAwarePaginator, self, &params).await
    }

    /// Fetch the page following `cursor` in `order`
    async fn cursor_paginate_async<K: CursorKey>(
        self,
        key: KeySelector<T, K>,
        page_size: u32,
        cursor: Option<K>,
        order: SortOrder,
    ) -> Result<CursorPage<T, K>> {
        let paginator = CursorPaginator::new(key);
        let params = CursorParams {
            page_size,
            cursor,
            order,
        };
        AsyncPaginator::<T, Self>::paginate_async(&paginator, self, &params).await
    }
}

impl<T: Send + 'static, Q: AsyncQueryable<T> + 'static> PaginateAsyncExt<T> for Q {}
