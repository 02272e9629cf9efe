//! Query types and traits
//!
//! Defines the contract a query source must satisfy to be paginated.

use crate::error::Result;
use crate::guard;
use crate::types::{CursorKey, KeyValue, SortOrder};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Selects the ordering key of an item
///
/// A selector carries two views of the same key:
/// - `extract`, a plain function used on materialized items (in-process
///   sorting and filtering, reading the next cursor off the last item)
/// - `field`, the name under which a store knows the key, used by sources
///   that push ordering and filtering down to the store
pub struct KeySelector<T, K> {
    field: String,
    extract: Arc<dyn Fn(&T) -> K + Send + Sync>,
}

impl<T, K: CursorKey> KeySelector<T, K> {
    /// Create a key selector
    ///
    /// Fails with `InvalidArgument` if `field` is empty or not an identifier.
    pub fn new<F>(field: impl Into<String>, extract: F) -> Result<Self>
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let field = field.into();
        guard::identifier(&field, "key_selector.field")?;
        Ok(Self {
            field,
            extract: Arc::new(extract),
        })
    }

    /// Name of the key at the store level
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Extract the key of an item
    pub fn key_of(&self, item: &T) -> K {
        (self.extract)(item)
    }
}

impl<T, K> Clone for KeySelector<T, K> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<T, K> fmt::Debug for KeySelector<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySelector")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Strict bound on a key, relative to a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyBound<K> {
    /// Keep keys strictly greater than the cursor
    After(K),
    /// Keep keys strictly less than the cursor
    Before(K),
}

impl<K: CursorKey> KeyBound<K> {
    /// Bound that resumes past `cursor` when walking in `order`
    pub fn past(cursor: K, order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => Self::After(cursor),
            SortOrder::Descending => Self::Before(cursor),
        }
    }

    /// Check whether a key satisfies the bound
    pub fn matches(&self, key: &K) -> bool {
        match self {
            Self::After(cursor) => key > cursor,
            Self::Before(cursor) => key < cursor,
        }
    }

    /// Comparison operator in SQL form
    pub fn operator(&self) -> &'static str {
        match self {
            Self::After(_) => ">",
            Self::Before(_) => "<",
        }
    }

    /// The cursor value
    pub fn cursor(&self) -> &K {
        match self {
            Self::After(cursor) | Self::Before(cursor) => cursor,
        }
    }

    /// The cursor value in source-neutral form
    pub fn key_value(&self) -> KeyValue {
        self.cursor().to_key_value()
    }
}

/// A deferred, composable query over items of type `T`
///
/// Builder operations record what to do; nothing touches the underlying
/// store until `fetch` or `count` is called. Operations apply in the order
/// they were added, the way a LINQ-style or SQL query composes.
pub trait Queryable<T>: Sized + Send {
    /// Order by the selected key
    fn order_by<K: CursorKey>(self, key: &KeySelector<T, K>, order: SortOrder) -> Self;

    /// Keep only items whose key satisfies the bound
    fn filter_key<K: CursorKey>(self, key: &KeySelector<T, K>, bound: KeyBound<K>) -> Self;

    /// Skip the first `count` items
    fn skip(self, count: u64) -> Self;

    /// Keep at most `count` items
    fn take(self, count: u64) -> Self;

    /// Materialize the query
    fn fetch(&self) -> Result<Vec<T>>;

    /// Count the items the query would produce
    fn count(&self) -> Result<u64>;
}

/// A query source whose materialization may suspend
#[async_trait]
pub trait AsyncQueryable<T: Send>: Queryable<T> + Sync {
    /// Materialize the query
    async fn fetch_async(&self) -> Result<Vec<T>>;

    /// Count the items the query would produce
    async fn count_async(&self) -> Result<u64>;
}
