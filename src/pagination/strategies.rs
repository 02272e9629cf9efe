//! Pagination strategy implementations
//!
//! Each strategy turns a deferred query plus parameters into exactly one page.
//! Parameters are validated before the query is touched, and each call
//! materializes the query once (size-aware pagination also issues one count).

use super::types::{
    total_pages, AsyncPaginator, CursorPage, CursorParams, Page, PageParams, Paginator, SizedPage,
};
use crate::error::{Error, Result};
use crate::query::{AsyncQueryable, KeyBound, KeySelector, Queryable};
use crate::types::CursorKey;
use async_trait::async_trait;
use futures::stream::{self, Stream};
use std::fmt;
use tracing::debug;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset pagination without a total count
///
/// Skips `(page - 1) * page_size` items and takes `page_size`. The query is
/// expected to be ordered already; no ordering is applied here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePaginator;

impl SimplePaginator {
    fn slice<T, Q: Queryable<T>>(query: Q, params: &PageParams) -> Result<Q> {
        params.validate()?;
        Ok(query.skip(params.offset()).take(u64::from(params.page_size)))
    }

    fn finish<T>(items: Vec<T>, params: &PageParams) -> Page<T> {
        debug!(
            page = params.page,
            page_size = params.page_size,
            items = items.len(),
            "Fetched offset page"
        );
        Page {
            items,
            page: params.page,
            page_size: params.page_size,
            total_items: None,
        }
    }
}

impl<T, Q: Queryable<T>> Paginator<T, Q> for SimplePaginator {
    type Params = PageParams;
    type Output = Page<T>;

    fn paginate(&self, query: Q, params: &PageParams) -> Result<Page<T>> {
        let query = Self::slice::<T, Q>(query, params)?;
        let items = query.fetch()?;
        Ok(Self::finish(items, params))
    }
}

#[async_trait]
impl<T, Q> AsyncPaginator<T, Q> for SimplePaginator
where
    T: Send + 'static,
    Q: AsyncQueryable<T> + 'static,
{
    type Params = PageParams;
    type Output = Page<T>;

    async fn paginate_async(&self, query: Q, params: &PageParams) -> Result<Page<T>> {
        let query = Self::slice::<T, Q>(query, params)?;
        let items = query.fetch_async().await?;
        Ok(Self::finish(items, params))
    }
}

// ============================================================================
// Size-Aware Pagination
// ============================================================================

/// Offset pagination that also reports item and page totals
///
/// The total is counted on the query as given, before any slicing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeAwarePaginator;

impl SizeAwarePaginator {
    fn finish<T>(items: Vec<T>, total_items: u64, params: &PageParams) -> SizedPage<T> {
        let total_pages = total_pages(total_items, params.page_size);
        debug!(
            page = params.page,
            page_size = params.page_size,
            items = items.len(),
            total_items,
            total_pages,
            "Fetched sized page"
        );
        SizedPage {
            items,
            page: params.page,
            page_size: params.page_size,
            total_items,
            total_pages,
        }
    }
}

impl<T, Q: Queryable<T>> Paginator<T, Q> for SizeAwarePaginator {
    type Params = PageParams;
    type Output = SizedPage<T>;

    fn paginate(&self, query: Q, params: &PageParams) -> Result<SizedPage<T>> {
        params.validate()?;
        let total_items = query.count()?;
        let items = query
            .skip(params.offset())
            .take(u64::from(params.page_size))
            .fetch()?;
        Ok(Self::finish(items, total_items, params))
    }
}

#[async_trait]
impl<T, Q> AsyncPaginator<T, Q> for SizeAwarePaginator
where
    T: Send + 'static,
    Q: AsyncQueryable<T> + 'static,
{
    type Params = PageParams;
    type Output = SizedPage<T>;

    async fn paginate_async(&self, query: Q, params: &PageParams) -> Result<SizedPage<T>> {
        params.validate()?;
        let total_items = query.count_async().await?;
        let query = query
            .skip(params.offset())
            .take(u64::from(params.page_size));
        let items = query.fetch_async().await?;
        Ok(Self::finish(items, total_items, params))
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Keyset pagination over an ordered key
///
/// Orders the query by the key, keeps items strictly past the cursor and
/// fetches one item more than the page size. The extra item only signals
/// that another page exists; it is never returned.
pub struct CursorPaginator<T, K> {
    key: KeySelector<T, K>,
}

impl<T, K> Clone for CursorPaginator<T, K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
        }
    }
}

impl<T, K> fmt::Debug for CursorPaginator<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorPaginator")
            .field("key", &self.key)
            .finish()
    }
}

impl<T, K: CursorKey> CursorPaginator<T, K> {
    /// Create a cursor paginator over the selected key
    pub fn new(key: KeySelector<T, K>) -> Self {
        Self { key }
    }

    /// Create a cursor paginator from a field name and an extractor
    pub fn by_key<F>(field: impl Into<String>, extract: F) -> Result<Self>
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Ok(Self::new(KeySelector::new(field, extract)?))
    }

    /// The key this paginator orders by
    pub fn key(&self) -> &KeySelector<T, K> {
        &self.key
    }

    fn prepare<Q: Queryable<T>>(&self, query: Q, params: &CursorParams<K>) -> Result<Q> {
        params.validate()?;
        let mut query = query.order_by(&self.key, params.order);
        if let Some(cursor) = &params.cursor {
            query = query.filter_key(&self.key, KeyBound::past(cursor.clone(), params.order));
        }
        Ok(query.take(u64::from(params.page_size) + 1))
    }

    fn finish(&self, mut items: Vec<T>, params: &CursorParams<K>) -> CursorPage<T, K> {
        let page_size = usize::try_from(params.page_size).unwrap_or(usize::MAX);
        let has_more = items.len() > page_size;
        if has_more {
            items.truncate(page_size);
        }
        let next_cursor = if has_more {
            items.last().map(|item| self.key.key_of(item))
        } else {
            None
        };

        debug!(
            key = self.key.field(),
            order = %params.order,
            page_size = params.page_size,
            items = items.len(),
            has_more,
            "Fetched cursor page"
        );

        CursorPage {
            items,
            current_cursor: params.cursor.clone(),
            next_cursor,
            has_more,
            page_size: params.page_size,
        }
    }

    /// Walk every page starting from `params`
    ///
    /// Each page resumes from the previous page's `next_cursor` and the
    /// stream ends after the first page without more items. The first error
    /// is yielded and ends the stream.
    pub fn traverse<'a, Q>(
        &'a self,
        query: Q,
        params: CursorParams<K>,
    ) -> impl Stream<Item = Result<CursorPage<T, K>>> + Send + 'a
    where
        T: Send + 'static,
        Q: AsyncQueryable<T> + Clone + 'static,
    {
        stream::try_unfold(Some(params), move |state| {
            let query = query.clone();
            async move {
                let Some(params) = state else {
                    return Ok(None);
                };
                let page = AsyncPaginator::<T, Q>::paginate_async(self, query, &params).await?;
                let next = params.next_for(&page);
                Ok::<_, Error>(Some((page, next)))
            }
        })
    }
}

impl<T, K, Q> Paginator<T, Q> for CursorPaginator<T, K>
where
    K: CursorKey,
    Q: Queryable<T>,
{
    type Params = CursorParams<K>;
    type Output = CursorPage<T, K>;

    fn paginate(&self, query: Q, params: &CursorParams<K>) -> Result<CursorPage<T, K>> {
        let items = self.prepare(query, params)?.fetch()?;
        Ok(self.finish(items, params))
    }
}

#[async_trait]
impl<T, K, Q> AsyncPaginator<T, Q> for CursorPaginator<T, K>
where
    T: Send + 'static,
    K: CursorKey,
    Q: AsyncQueryable<T> + 'static,
{
    type Params = CursorParams<K>;
    type Output = CursorPage<T, K>;

    async fn paginate_async(
        &self,
        query: Q,
        params: &CursorParams<K>,
    ) -> Result<CursorPage<T, K>> {
        let query = self.prepare(query, params)?;
        let items = query.fetch_async().await?;
        Ok(self.finish(items, params))
    }
}
