//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::query::{AsyncQueryable, KeyBound, KeySelector, MemorySource, Queryable};
use crate::types::{CursorKey, SortOrder};
use async_trait::async_trait;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use test_case::test_case;

fn numbers(range: std::ops::RangeInclusive<i64>) -> MemorySource<i64> {
    MemorySource::new(range.collect())
}

fn identity() -> KeySelector<i64, i64> {
    KeySelector::new("id", |n: &i64| *n).unwrap()
}

fn cursor_paginator() -> CursorPaginator<i64, i64> {
    CursorPaginator::new(identity())
}

fn cursor_params(page_size: u32, cursor: Option<i64>) -> CursorParams<i64> {
    CursorParams {
        page_size,
        cursor,
        order: SortOrder::Ascending,
    }
}

// ============================================================================
// Test Sources
// ============================================================================

/// Records every operation applied to it before delegating to memory
#[derive(Clone)]
struct RecordingSource {
    inner: MemorySource<i64>,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingSource {
    fn new(items: Vec<i64>) -> Self {
        Self {
            inner: MemorySource::new(items),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(self, entry: String) -> Self {
        self.log.lock().unwrap().push(entry);
        self
    }

    fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().unwrap().clone()
    }
}

impl Queryable<i64> for RecordingSource {
    fn order_by<K: CursorKey>(self, key: &KeySelector<i64, K>, order: SortOrder) -> Self {
        let mut this = self.record(format!("order_by({} {order})", key.field()));
        this.inner = this.inner.order_by(key, order);
        this
    }

    fn filter_key<K: CursorKey>(self, key: &KeySelector<i64, K>, bound: KeyBound<K>) -> Self {
        let entry = format!(
            "filter_key({} {} {})",
            key.field(),
            bound.operator(),
            bound.key_value()
        );
        let mut this = self.record(entry);
        this.inner = this.inner.filter_key(key, bound);
        this
    }

    fn skip(self, count: u64) -> Self {
        let mut this = self.record(format!("skip({count})"));
        this.inner = this.inner.skip(count);
        this
    }

    fn take(self, count: u64) -> Self {
        let mut this = self.record(format!("take({count})"));
        this.inner = this.inner.take(count);
        this
    }

    fn fetch(&self) -> Result<Vec<i64>> {
        self.log.lock().unwrap().push("fetch".to_string());
        self.inner.fetch()
    }

    fn count(&self) -> Result<u64> {
        self.log.lock().unwrap().push("count".to_string());
        self.inner.count()
    }
}

/// Fails on materialization
#[derive(Clone)]
struct FailingSource;

impl Queryable<i64> for FailingSource {
    fn order_by<K: CursorKey>(self, _key: &KeySelector<i64, K>, _order: SortOrder) -> Self {
        self
    }

    fn filter_key<K: CursorKey>(self, _key: &KeySelector<i64, K>, _bound: KeyBound<K>) -> Self {
        self
    }

    fn skip(self, _count: u64) -> Self {
        self
    }

    fn take(self, _count: u64) -> Self {
        self
    }

    fn fetch(&self) -> Result<Vec<i64>> {
        Err(Error::from_source(std::io::Error::other("connection reset")))
    }

    fn count(&self) -> Result<u64> {
        Err(Error::from_source(std::io::Error::other("connection reset")))
    }
}

#[async_trait]
impl AsyncQueryable<i64> for FailingSource {
    async fn fetch_async(&self) -> Result<Vec<i64>> {
        self.fetch()
    }

    async fn count_async(&self) -> Result<u64> {
        self.count()
    }
}

// ============================================================================
// Parameter Tests
// ============================================================================

#[test]
fn test_page_params_defaults() {
    let params = PageParams::default();
    assert_eq!(params.page, 1);
    assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(params.offset(), 0);
}

#[test_case(1, 10, 0 ; "first page")]
#[test_case(3, 10, 20 ; "third page")]
#[test_case(2, 25, 25 ; "second page of 25")]
fn test_page_params_offset(page: u32, page_size: u32, expected: u64) {
    assert_eq!(PageParams::new(page, page_size).offset(), expected);
}

#[test_case(0, 50, 0 ; "no items")]
#[test_case(50, 10, 5 ; "exact")]
#[test_case(51, 10, 6 ; "partial last page")]
#[test_case(5, 10, 1 ; "single partial page")]
fn test_total_pages(total_items: u64, page_size: u32, expected: u64) {
    assert_eq!(total_pages(total_items, page_size), expected);
}

#[test]
fn test_cursor_params_next_for() {
    let params = cursor_params(10, None).with_order(SortOrder::Descending);
    let page = CursorPage::<i64, i64> {
        items: vec![50, 49],
        current_cursor: None,
        next_cursor: Some(49),
        has_more: true,
        page_size: 2,
    };
    let next = params.next_for(&page).unwrap();
    assert_eq!(next.cursor, Some(49));
    assert_eq!(next.order, SortOrder::Descending);

    let last = CursorPage::<i64, i64> {
        has_more: false,
        next_cursor: None,
        ..page
    };
    assert!(params.next_for(&last).is_none());
}

// ============================================================================
// SimplePaginator Tests
// ============================================================================

#[test]
fn test_simple_paginate_second_page() {
    let page = SimplePaginator
        .paginate(numbers(1..=50), &PageParams::new(2, 10))
        .unwrap();
    assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_items, None);
}

#[test]
fn test_simple_paginate_past_end() {
    let page = SimplePaginator
        .paginate(numbers(1..=50), &PageParams::new(9, 10))
        .unwrap();
    assert!(page.items.is_empty());
}

#[test_case(0, 10, "page" ; "zero page")]
#[test_case(1, 0, "page_size" ; "zero page size")]
fn test_simple_paginate_rejects_non_positive(page: u32, page_size: u32, name: &str) {
    let source = RecordingSource::new((1..=50).collect());
    let log = Arc::clone(&source.log);

    let err = SimplePaginator
        .paginate(source, &PageParams::new(page, page_size))
        .unwrap_err();

    assert!(matches!(err, Error::OutOfRange { name: ref n, .. } if n == name));
    assert!(RecordingSource::entries(&log).is_empty());
}

// ============================================================================
// SizeAwarePaginator Tests
// ============================================================================

#[test]
fn test_size_aware_paginate_reports_totals() {
    let page = SizeAwarePaginator
        .paginate(numbers(1..=50), &PageParams::new(2, 10))
        .unwrap();
    assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
    assert_eq!(page.total_items, 50);
    assert_eq!(page.total_pages, 5);
    assert!(page.has_next());
    assert!(page.has_previous());
}

#[test]
fn test_size_aware_paginate_partial_last_page() {
    let page = SizeAwarePaginator
        .paginate(numbers(1..=45), &PageParams::new(5, 10))
        .unwrap();
    assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
    assert_eq!(page.total_pages, 5);
    assert!(!page.has_next());
}

#[test]
fn test_size_aware_paginate_empty_source() {
    let page = SizeAwarePaginator
        .paginate(MemorySource::<i64>::new(Vec::new()), &PageParams::new(1, 10))
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
}

#[test]
fn test_size_aware_counts_before_slicing() {
    let source = RecordingSource::new((1..=50).collect());
    let log = Arc::clone(&source.log);

    SizeAwarePaginator
        .paginate(source, &PageParams::new(3, 10))
        .unwrap();

    assert_eq!(
        RecordingSource::entries(&log),
        vec!["count", "skip(20)", "take(10)", "fetch"]
    );
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test]
fn test_cursor_first_page() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(10, None))
        .unwrap();
    assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
    assert!(page.has_more);
    assert_eq!(page.next_cursor, Some(10));
    assert_eq!(page.current_cursor, None);
    assert_eq!(page.page_size, 10);
}

#[test]
fn test_cursor_resumes_after_cursor() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(10, Some(20)))
        .unwrap();
    assert_eq!(page.items, (21..=30).collect::<Vec<_>>());
    assert!(page.has_more);
    assert_eq!(page.next_cursor, Some(30));
    assert_eq!(page.current_cursor, Some(20));
}

#[test]
fn test_cursor_short_last_page() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(10, Some(45)))
        .unwrap();
    assert_eq!(page.items, (46..=50).collect::<Vec<_>>());
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn test_cursor_exact_last_page_has_no_more() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(10, Some(40)))
        .unwrap();
    assert_eq!(page.items, (41..=50).collect::<Vec<_>>());
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn test_cursor_at_end() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(10, Some(50)))
        .unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, None);
}

#[test_case(None ; "no cursor")]
#[test_case(Some(20) ; "with cursor")]
fn test_cursor_empty_source(cursor: Option<i64>) {
    let page = cursor_paginator()
        .paginate(MemorySource::new(Vec::new()), &cursor_params(10, cursor))
        .unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn test_cursor_between_keys_acts_as_boundary() {
    let source = MemorySource::new(vec![10, 20, 30, 40]);
    let page = cursor_paginator()
        .paginate(source, &cursor_params(10, Some(25)))
        .unwrap();
    assert_eq!(page.items, vec![30, 40]);
}

#[test]
fn test_cursor_zero_is_a_real_cursor() {
    let paginator = cursor_paginator();

    let first = paginator
        .paginate(numbers(0..=5), &cursor_params(10, None))
        .unwrap();
    assert_eq!(first.items, vec![0, 1, 2, 3, 4, 5]);

    let after_zero = paginator
        .paginate(numbers(0..=5), &cursor_params(10, Some(0)))
        .unwrap();
    assert_eq!(after_zero.items, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_cursor_descending() {
    let paginator = cursor_paginator();
    let params = cursor_params(10, None).with_order(SortOrder::Descending);

    let first = paginator.paginate(numbers(1..=50), &params).unwrap();
    assert_eq!(first.items, (41..=50).rev().collect::<Vec<_>>());
    assert_eq!(first.next_cursor, Some(41));

    let second = paginator
        .paginate(numbers(1..=50), &params.with_cursor(41))
        .unwrap();
    assert_eq!(second.items, (31..=40).rev().collect::<Vec<_>>());
}

#[test]
fn test_cursor_unordered_source() {
    let source = MemorySource::new(vec![5, 3, 9, 1, 7]);
    let page = cursor_paginator()
        .paginate(source, &cursor_params(2, Some(3)))
        .unwrap();
    assert_eq!(page.items, vec![5, 7]);
    assert_eq!(page.next_cursor, Some(7));
}

#[test]
fn test_cursor_materializes_once_with_one_extra() {
    let source = RecordingSource::new((1..=50).collect());
    let log = Arc::clone(&source.log);

    cursor_paginator()
        .paginate(source, &cursor_params(10, Some(20)))
        .unwrap();

    assert_eq!(
        RecordingSource::entries(&log),
        vec!["order_by(id asc)", "filter_key(id > 20)", "take(11)", "fetch"]
    );
}

#[test]
fn test_cursor_descending_uses_less_than() {
    let source = RecordingSource::new((1..=50).collect());
    let log = Arc::clone(&source.log);
    let params = cursor_params(5, Some(30)).with_order(SortOrder::Descending);

    cursor_paginator().paginate(source, &params).unwrap();

    assert_eq!(
        RecordingSource::entries(&log),
        vec!["order_by(id desc)", "filter_key(id < 30)", "take(6)", "fetch"]
    );
}

#[test]
fn test_cursor_rejects_zero_page_size_before_query() {
    let source = RecordingSource::new((1..=50).collect());
    let log = Arc::clone(&source.log);

    let err = cursor_paginator()
        .paginate(source, &cursor_params(0, None))
        .unwrap_err();

    assert!(matches!(err, Error::OutOfRange { .. }));
    assert!(RecordingSource::entries(&log).is_empty());
}

#[test]
fn test_source_errors_propagate_unchanged() {
    let err = cursor_paginator()
        .paginate(FailingSource, &cursor_params(10, None))
        .unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert_eq!(err.to_string(), "connection reset");

    let err = SizeAwarePaginator
        .paginate(FailingSource, &PageParams::new(1, 10))
        .unwrap_err();
    assert!(matches!(err, Error::Source(_)));
}

#[test]
fn test_cursor_is_idempotent() {
    let paginator = cursor_paginator();
    let params = cursor_params(7, Some(12));
    let first = paginator.paginate(numbers(1..=50), &params).unwrap();
    let second = paginator.paginate(numbers(1..=50), &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cursor_walk_covers_source_without_gaps() {
    let paginator = cursor_paginator();
    let mut params = cursor_params(7, None);
    let mut seen = Vec::new();

    loop {
        let page = paginator.paginate(numbers(1..=50), &params).unwrap();
        if let Some(last) = seen.last() {
            assert!(page.items.iter().all(|item| item > last));
        }
        seen.extend(page.items.iter().copied());
        match params.next_for(&page) {
            Some(next) => params = next,
            None => break,
        }
    }

    assert_eq!(seen, (1..=50).collect::<Vec<_>>());
}

#[test]
fn test_cursor_by_key_validates_field() {
    let err = CursorPaginator::<i64, i64>::by_key("", |n: &i64| *n).unwrap_err();
    assert!(err.is_argument_error());
}

// ============================================================================
// Async Tests
// ============================================================================

#[tokio::test]
async fn test_async_matches_sync() {
    let paginator = cursor_paginator();
    let params = cursor_params(10, Some(20));

    let sync_page = paginator.paginate(numbers(1..=50), &params).unwrap();
    let async_page = paginator
        .paginate_async(numbers(1..=50), &params)
        .await
        .unwrap();
    assert_eq!(sync_page, async_page);

    let sized = SizeAwarePaginator
        .paginate_async(numbers(1..=50), &PageParams::new(5, 10))
        .await
        .unwrap();
    assert_eq!(sized.items, (41..=50).collect::<Vec<_>>());
    assert_eq!(sized.total_pages, 5);
}

#[tokio::test]
async fn test_async_source_error_propagates() {
    let err = SimplePaginator
        .paginate_async(FailingSource, &PageParams::new(1, 10))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "connection reset");
}

#[tokio::test]
async fn test_traverse_yields_every_page() {
    let paginator = cursor_paginator();
    let pages: Vec<_> = paginator
        .traverse(numbers(1..=50), cursor_params(10, None))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pages.len(), 5);
    assert!(pages[..4].iter().all(|page| page.has_more));
    assert!(!pages[4].has_more);

    let items: Vec<i64> = pages.into_iter().flat_map(|page| page.items).collect();
    assert_eq!(items, (1..=50).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_traverse_stops_on_error() {
    let paginator = cursor_paginator();
    let results: Vec<_> = futures::StreamExt::collect(
        paginator.traverse(FailingSource, cursor_params(10, None)),
    )
    .await;
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}

// ============================================================================
// Extension Tests
// ============================================================================

#[test]
fn test_paginate_ext() {
    let page = numbers(1..=50).paginate(2, 20).unwrap();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 20);

    let page = numbers(1..=50).simple_paginate(3, 20).unwrap();
    assert_eq!(page.items, (41..=50).collect::<Vec<_>>());

    let page = numbers(1..=50)
        .cursor_paginate(identity(), 5, Some(5), SortOrder::Ascending)
        .unwrap();
    assert_eq!(page.items, (6..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_paginate_async_ext() {
    let page = numbers(1..=50)
        .cursor_paginate_async(identity(), 5, None, SortOrder::Descending)
        .await
        .unwrap();
    assert_eq!(page.items, vec![50, 49, 48, 47, 46]);

    let page = numbers(1..=50).simple_paginate_async(1, 3).await.unwrap();
    assert_eq!(page.items, vec![1, 2, 3]);
}

// ============================================================================
// DTO Tests
// ============================================================================

#[test]
fn test_map_items_keeps_metadata() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(3, None))
        .unwrap()
        .map_items(|n| n.to_string());
    assert_eq!(page.items, vec!["1", "2", "3"]);
    assert_eq!(page.next_cursor, Some(3));
    assert!(page.has_more);
}

#[test]
fn test_cursor_page_serialization() {
    let page = cursor_paginator()
        .paginate(numbers(1..=50), &cursor_params(2, Some(4)))
        .unwrap();
    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(
        value,
        json!({
            "items": [5, 6],
            "current_cursor": 4,
            "next_cursor": 6,
            "has_more": true,
            "page_size": 2
        })
    );
}

#[test]
fn test_result_traits() {
    let page = numbers(1..=50).paginate(1, 10).unwrap();
    assert_eq!(PagedResult::total_items(&page), Some(50));
    assert_eq!(PaginationResult::page_size(&page), 10);
    assert_eq!(PaginationResult::items(&page).len(), 10);

    let simple = numbers(1..=50).simple_paginate(1, 10).unwrap();
    assert_eq!(PagedResult::total_items(&simple), None);
    assert_eq!(simple.into_items().len(), 10);
}
