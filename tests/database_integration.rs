//! Database integration tests with DuckDB
//!
//! Runs pagination against DuckDB database files and CSV files created in a
//! temp directory, both through the library and through the CLI runner.

use clap::Parser;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use solidafy_paginate::cli::{Cli, Runner};
use solidafy_paginate::database::{json_key, DatabaseEngine};
use solidafy_paginate::{
    AsyncPaginator, CursorPaginator, CursorParams, Error, KeyValue, PageParams,
    SizeAwarePaginator, SortOrder, UrlExt,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a database file with an `events` table of 30 rows
fn create_database(dir: &Path) -> PathBuf {
    let path = dir.join("events.duckdb");
    let conn = duckdb::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE events (id BIGINT, kind VARCHAR);
         INSERT INTO events
             SELECT i, CASE WHEN i % 2 = 0 THEN 'click' ELSE 'view' END
             FROM range(1, 31) t(i);",
    )
    .unwrap();
    path
}

fn create_csv(dir: &Path) -> PathBuf {
    let path = dir.join("users.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "id,email").unwrap();
    for id in 1..=12 {
        writeln!(file, "{id},user{id}@example.com").unwrap();
    }
    path
}

fn run(args: &[&str]) -> solidafy_paginate::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("solidafy-paginate").chain(args.iter().copied()))
        .unwrap();
    tokio_test::block_on(Runner::new(cli).run())
}

#[test]
fn test_file_database_tables() {
    let dir = TempDir::new().unwrap();
    let path = create_database(dir.path());

    let engine = DatabaseEngine::open(&path).unwrap();
    assert_eq!(engine.list_tables().unwrap(), vec!["events".to_string()]);
}

#[tokio::test]
async fn test_file_database_cursor_traversal() {
    let dir = TempDir::new().unwrap();
    let engine = DatabaseEngine::open(create_database(dir.path())).unwrap();

    let paginator = CursorPaginator::new(json_key("id").unwrap());
    let params = CursorParams::new(8).with_cursor(KeyValue::Int(10));

    let pages: Vec<_> = paginator
        .traverse(engine.json_rows("events").unwrap(), params)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].items[0], json!({"id": 11, "kind": "view"}).as_object().unwrap().clone());
    assert_eq!(pages[0].next_cursor, Some(KeyValue::Int(18)));
    assert_eq!(pages[2].items.len(), 4);
    assert!(!pages[2].has_more);
}

#[tokio::test]
async fn test_csv_size_aware_with_links() {
    let dir = TempDir::new().unwrap();
    let csv = create_csv(dir.path());
    let engine = DatabaseEngine::open_in_memory().unwrap();

    let source = engine.json_rows(&csv.display().to_string()).unwrap();
    let page = AsyncPaginator::<_, _>::paginate_async(
        &SizeAwarePaginator,
        source,
        &PageParams::new(2, 5),
    )
    .await
    .unwrap();

    assert_eq!(page.total_items, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items[0]["email"], json!("user6@example.com"));

    let linked = page.with_url("https://api.example.com/users").unwrap();
    assert_eq!(
        linked.next_page_url.as_deref(),
        Some("https://api.example.com/users?page=3&pageSize=5")
    );
}

#[tokio::test]
async fn test_descending_cursor_on_csv() {
    let dir = TempDir::new().unwrap();
    let csv = create_csv(dir.path());
    let engine = DatabaseEngine::open_in_memory().unwrap();

    let paginator = CursorPaginator::new(json_key("id").unwrap());
    let params = CursorParams::new(5)
        .with_cursor(KeyValue::Int(3))
        .with_order(SortOrder::Descending);
    let page = paginator
        .paginate_async(engine.json_rows(&csv.display().to_string()).unwrap(), &params)
        .await
        .unwrap();

    let ids: Vec<_> = page.items.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!(2), json!(1)]);
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, None);
}

// ============================================================================
// CLI Runner
// ============================================================================

#[test]
fn test_runner_commands() {
    let dir = TempDir::new().unwrap();
    let path = create_database(dir.path());
    let db = path.display().to_string();

    run(&["-d", &db, "tables"]).unwrap();
    run(&["-d", &db, "page", "-t", "events", "-p", "2", "--order-by", "id"]).unwrap();
    run(&[
        "-d",
        &db,
        "--base-url",
        "https://api.example.com/events",
        "sized",
        "-t",
        "events",
        "--page-size",
        "7",
    ])
    .unwrap();
    run(&["-d", &db, "cursor", "-t", "events", "-k", "id", "--all"]).unwrap();
}

#[test]
fn test_runner_config_file() {
    let dir = TempDir::new().unwrap();
    let path = create_database(dir.path());
    let config = dir.path().join("pagination.yaml");
    std::fs::write(&config, "page_size: 4\norder: desc\nlinks:\n  cursor_param: after\n").unwrap();

    run(&[
        "-d",
        &path.display().to_string(),
        "-C",
        &config.display().to_string(),
        "--base-url",
        "/events",
        "cursor",
        "-t",
        "events",
        "-k",
        "id",
        "--cursor",
        "20",
    ])
    .unwrap();
}

#[test]
fn test_runner_cursor_typed_by_key_column() {
    let dir = TempDir::new().unwrap();
    let db = create_database(dir.path()).display().to_string();

    run(&["-d", &db, "cursor", "-t", "events", "-k", "kind", "--cursor", "007"]).unwrap();
    run(&["-d", &db, "cursor", "-t", "events", "-k", "id", "--cursor", "007"]).unwrap();

    let err = run(&["-d", &db, "cursor", "-t", "events", "-k", "id", "--cursor", "abc"])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCursor { .. }));
    assert!(err.is_argument_error());
}

#[test]
fn test_runner_reports_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.duckdb").display().to_string();

    let err = run(&["-d", &missing, "tables"]).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));

    let err = run(&["page", "-t", "events", "-p", "0"]).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));

    let err = run(&["page", "-t", "no_such_table"]).unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}
