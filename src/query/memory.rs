//! In-process query source
//!
//! Evaluates deferred operations over a shared, immutable vector of items.

use super::types::{AsyncQueryable, KeyBound, KeySelector, Queryable};
use crate::error::Result;
use crate::types::{CursorKey, SortOrder};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A recorded operation, applied at materialization time
enum MemoryOp<T> {
    Order(Comparator<T>),
    Filter(Predicate<T>),
    Skip(u64),
    Take(u64),
}

impl<T> Clone for MemoryOp<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Order(cmp) => Self::Order(Arc::clone(cmp)),
            Self::Filter(pred) => Self::Filter(Arc::clone(pred)),
            Self::Skip(n) => Self::Skip(*n),
            Self::Take(n) => Self::Take(*n),
        }
    }
}

/// Query source over items held in memory
///
/// Ordering is stable, so items with equal keys keep their source order.
pub struct MemorySource<T> {
    items: Arc<Vec<T>>,
    ops: Vec<MemoryOp<T>>,
}

impl<T> MemorySource<T> {
    /// Create a source over the given items
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
            ops: Vec::new(),
        }
    }

    /// Create a source sharing already-allocated items
    pub fn from_shared(items: Arc<Vec<T>>) -> Self {
        Self {
            items,
            ops: Vec::new(),
        }
    }

    /// Number of items in the underlying store, ignoring recorded operations
    pub fn source_len(&self) -> usize {
        self.items.len()
    }

    fn push(mut self, op: MemoryOp<T>) -> Self {
        self.ops.push(op);
        self
    }

    /// Run the recorded operations, yielding references into the store
    fn evaluate(&self) -> Vec<&T> {
        let mut view: Vec<&T> = self.items.iter().collect();
        for op in &self.ops {
            match op {
                MemoryOp::Order(cmp) => view.sort_by(|a, b| cmp(*a, *b)),
                MemoryOp::Filter(pred) => view.retain(|item| pred(*item)),
                MemoryOp::Skip(n) => {
                    let n = usize::try_from(*n).unwrap_or(usize::MAX).min(view.len());
                    view.drain(..n);
                }
                MemoryOp::Take(n) => {
                    view.truncate(usize::try_from(*n).unwrap_or(usize::MAX));
                }
            }
        }
        view
    }
}

impl<T> Clone for MemorySource<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            ops: self.ops.clone(),
        }
    }
}

impl<T> fmt::Debug for MemorySource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("items", &self.items.len())
            .field("ops", &self.ops.len())
            .finish()
    }
}

impl<T> From<Vec<T>> for MemorySource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> Queryable<T> for MemorySource<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn order_by<K: CursorKey>(self, key: &KeySelector<T, K>, order: SortOrder) -> Self {
        let key = key.clone();
        let cmp: Comparator<T> = Arc::new(move |a: &T, b: &T| {
            let ordering = key.key_of(a).cmp(&key.key_of(b));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        self.push(MemoryOp::Order(cmp))
    }

    fn filter_key<K: CursorKey>(self, key: &KeySelector<T, K>, bound: KeyBound<K>) -> Self {
        let key = key.clone();
        let pred: Predicate<T> = Arc::new(move |item: &T| bound.matches(&key.key_of(item)));
        self.push(MemoryOp::Filter(pred))
    }

    fn skip(self, count: u64) -> Self {
        self.push(MemoryOp::Skip(count))
    }

    fn take(self, count: u64) -> Self {
        self.push(MemoryOp::Take(count))
    }

    fn fetch(&self) -> Result<Vec<T>> {
        Ok(self.evaluate().into_iter().cloned().collect())
    }

    fn count(&self) -> Result<u64> {
        Ok(self.evaluate().len() as u64)
    }
}

#[async_trait]
impl<T> AsyncQueryable<T> for MemorySource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch_async(&self) -> Result<Vec<T>> {
        self.fetch()
    }

    async fn count_async(&self) -> Result<u64> {
        self.count()
    }
}
