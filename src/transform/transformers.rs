//! Result transformers
//!
//! Each transformer decorates one page type with navigation URLs.

use super::types::{CursorUrlPage, LinkBuilder, UrlPage, TOTAL_ITEMS_PARAM, TOTAL_PAGES_PARAM};
use crate::error::Result;
use crate::pagination::{CursorPage, Page, PagedResult, PaginationResult, SizedPage};
use crate::types::CursorKey;

/// Converts a pagination result into another shape
pub trait ResultTransformer<R> {
    /// Shape produced
    type Output;

    /// Transform a result
    fn transform(&self, result: R) -> Self::Output;
}

// ============================================================================
// Simple URLs
// ============================================================================

/// Adds page-number links without knowing the total
///
/// A next link is offered whenever the page is full, so the last page of an
/// exactly divisible source still links to an empty page.
#[derive(Debug, Clone, Default)]
pub struct SimpleUrlTransformer {
    links: LinkBuilder,
}

impl SimpleUrlTransformer {
    /// Create a transformer building links on `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_links(LinkBuilder::new(base_url)?))
    }

    /// Create a transformer from a configured link builder
    pub fn with_links(links: LinkBuilder) -> Self {
        Self { links }
    }

    fn decorate<T, R: PagedResult<T>>(&self, result: R) -> UrlPage<T> {
        let page = result.page();
        let page_size = result.page_size();
        let total_items = result.total_items();
        let has_next = result.items().len() == page_size as usize;
        let url = |page: u64| self.links.page_url(page, page_size, &[]);

        UrlPage {
            current_url: url(u64::from(page)),
            first_page_url: url(1),
            previous_page_url: (page > 1).then(|| url(u64::from(page) - 1)),
            next_page_url: has_next.then(|| url(u64::from(page) + 1)),
            last_page_url: None,
            items: result.into_items(),
            page,
            page_size,
            total_items,
            total_pages: None,
        }
    }
}

impl<T> ResultTransformer<Page<T>> for SimpleUrlTransformer {
    type Output = UrlPage<T>;

    fn transform(&self, result: Page<T>) -> UrlPage<T> {
        self.decorate(result)
    }
}

impl<T> ResultTransformer<SizedPage<T>> for SimpleUrlTransformer {
    type Output = UrlPage<T>;

    fn transform(&self, result: SizedPage<T>) -> UrlPage<T> {
        self.decorate(result)
    }
}

// ============================================================================
// Size-Aware URLs
// ============================================================================

/// Adds first, previous, next and last links using the page totals
#[derive(Debug, Clone, Default)]
pub struct SizeAwareUrlTransformer {
    links: LinkBuilder,
    include_total_items: bool,
    include_total_pages: bool,
}

impl SizeAwareUrlTransformer {
    /// Create a transformer building links on `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_links(LinkBuilder::new(base_url)?))
    }

    /// Create a transformer from a configured link builder
    pub fn with_links(links: LinkBuilder) -> Self {
        Self {
            links,
            include_total_items: false,
            include_total_pages: false,
        }
    }

    /// Carry the total item count on every link
    #[must_use]
    pub fn include_total_items(mut self) -> Self {
        self.include_total_items = true;
        self
    }

    /// Carry the total page count on every link
    #[must_use]
    pub fn include_total_pages(mut self) -> Self {
        self.include_total_pages = true;
        self
    }
}

impl<T> ResultTransformer<SizedPage<T>> for SizeAwareUrlTransformer {
    type Output = UrlPage<T>;

    fn transform(&self, result: SizedPage<T>) -> UrlPage<T> {
        let mut extra = Vec::new();
        if self.include_total_items {
            extra.push((TOTAL_ITEMS_PARAM, result.total_items.to_string()));
        }
        if self.include_total_pages {
            extra.push((TOTAL_PAGES_PARAM, result.total_pages.to_string()));
        }
        let url = |page: u64| self.links.page_url(page, result.page_size, &extra);

        let page = u64::from(result.page);
        let last_page = result.total_pages.max(1);

        UrlPage {
            current_url: url(page),
            first_page_url: url(1),
            previous_page_url: (page > 1).then(|| url(page - 1)),
            next_page_url: (page < result.total_pages).then(|| url(page + 1)),
            last_page_url: Some(url(last_page)),
            page: result.page,
            page_size: result.page_size,
            total_items: Some(result.total_items),
            total_pages: Some(result.total_pages),
            items: result.items,
        }
    }
}

// ============================================================================
// Cursor URLs
// ============================================================================

/// Adds current and next links carrying cursors
#[derive(Debug, Clone, Default)]
pub struct CursorUrlTransformer {
    links: LinkBuilder,
}

impl CursorUrlTransformer {
    /// Create a transformer building links on `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_links(LinkBuilder::new(base_url)?))
    }

    /// Create a transformer from a configured link builder
    pub fn with_links(links: LinkBuilder) -> Self {
        Self { links }
    }
}

impl<T, K: CursorKey> ResultTransformer<CursorPage<T, K>> for CursorUrlTransformer {
    type Output = CursorUrlPage<T, K>;

    fn transform(&self, result: CursorPage<T, K>) -> CursorUrlPage<T, K> {
        let current = result.current_cursor.as_ref().map(CursorKey::to_key_value);
        let current_url = self.links.cursor_url(current.as_ref(), result.page_size);

        let next_page_url = match (&result.next_cursor, result.has_more) {
            (Some(next), true) => {
                Some(self.links.cursor_url(Some(&next.to_key_value()), result.page_size))
            }
            _ => None,
        };

        CursorUrlPage {
            page: result,
            current_url,
            next_page_url,
        }
    }
}
