//! Transformation types
//!
//! URL-decorated pages and the link builder shared by every URL transformer.

use crate::error::{Error, Result};
use crate::guard;
use crate::pagination::CursorPage;
use crate::types::{CursorKey, KeyValue};
use serde::Serialize;
use url::form_urlencoded;
use url::Url;

/// Default name of the page number query parameter
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Default name of the page size query parameter
pub const DEFAULT_PAGE_SIZE_PARAM: &str = "pageSize";

/// Default name of the cursor query parameter
pub const DEFAULT_CURSOR_PARAM: &str = "cursor";

/// Query parameter carrying the total item count
pub const TOTAL_ITEMS_PARAM: &str = "totalItems";

/// Query parameter carrying the total page count
pub const TOTAL_PAGES_PARAM: &str = "totalPages";

// ============================================================================
// URL Pages
// ============================================================================

/// Page-number page decorated with navigation links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    pub current_url: String,
    pub first_page_url: String,
    pub previous_page_url: Option<String>,
    pub next_page_url: Option<String>,
    pub last_page_url: Option<String>,
}

/// Cursor page decorated with navigation links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "T: Serialize, K: CursorKey"))]
pub struct CursorUrlPage<T, K> {
    #[serde(flatten)]
    pub page: CursorPage<T, K>,
    pub current_url: String,
    pub next_page_url: Option<String>,
}

// ============================================================================
// Link Builder
// ============================================================================

/// Builds navigation URLs from a base URL and query parameters
///
/// An empty base yields relative links (`?page=2&pageSize=10`). Absolute
/// bases are validated; a base that already has a query string is extended
/// with `&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_url: String,
    page_param: String,
    page_size_param: String,
    cursor_param: String,
    include_page_size: bool,
    extra_params: Vec<(String, String)>,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            page_size_param: DEFAULT_PAGE_SIZE_PARAM.to_string(),
            cursor_param: DEFAULT_CURSOR_PARAM.to_string(),
            include_page_size: true,
            extra_params: Vec::new(),
        }
    }
}

impl LinkBuilder {
    /// Create a link builder for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.contains("://") {
            Url::parse(&base_url)?;
        }
        Ok(Self {
            base_url,
            ..Default::default()
        })
    }

    /// The base URL links are built on
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Rename one of the standard parameters (`page`, `pageSize`, `cursor`)
    ///
    /// `original` may be the default name or the current one.
    pub fn rename_param(mut self, original: &str, new_name: impl Into<String>) -> Result<Self> {
        let new_name = new_name.into();
        guard::not_empty(&new_name, "new_name")?;

        let slot = match original {
            DEFAULT_PAGE_PARAM => &mut self.page_param,
            DEFAULT_PAGE_SIZE_PARAM => &mut self.page_size_param,
            DEFAULT_CURSOR_PARAM => &mut self.cursor_param,
            name if name == self.page_param => &mut self.page_param,
            name if name == self.page_size_param => &mut self.page_size_param,
            name if name == self.cursor_param => &mut self.cursor_param,
            _ => {
                return Err(Error::invalid_argument(
                    "original",
                    format!("'{original}' is not a pagination parameter"),
                ))
            }
        };
        *slot = new_name;
        Ok(self)
    }

    /// Append a static parameter to every link
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((name.into(), value.into()));
        self
    }

    /// Whether links carry the page size
    #[must_use]
    pub fn include_page_size(mut self, include: bool) -> Self {
        self.include_page_size = include;
        self
    }

    /// Link to a page number
    pub fn page_url(&self, page: u64, page_size: u32, extra: &[(&str, String)]) -> String {
        let mut pairs = vec![(self.page_param.as_str(), page.to_string())];
        if self.include_page_size {
            pairs.push((self.page_size_param.as_str(), page_size.to_string()));
        }
        pairs.extend(extra.iter().map(|(name, value)| (*name, value.clone())));
        self.build(&pairs)
    }

    /// Link to the page after a cursor, or the first page when `cursor` is `None`
    pub fn cursor_url(&self, cursor: Option<&KeyValue>, page_size: u32) -> String {
        let mut pairs = Vec::with_capacity(2);
        if let Some(cursor) = cursor {
            pairs.push((self.cursor_param.as_str(), cursor.to_string()));
        }
        if self.include_page_size {
            pairs.push((self.page_size_param.as_str(), page_size.to_string()));
        }
        self.build(&pairs)
    }

    fn build(&self, pairs: &[(&str, String)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
        for (name, value) in &self.extra_params {
            query.append_pair(name, value);
        }
        let query = query.finish();
        if query.is_empty() {
            return self.base_url.clone();
        }

        let separator = match self.base_url.find('?') {
            None => "?",
            Some(_) if self.base_url.ends_with('?') || self.base_url.ends_with('&') => "",
            Some(_) => "&",
        };
        format!("{}{separator}{query}", self.base_url)
    }
}
