//! DuckDB query source
//!
//! Pushes ordering, cursor filters and slicing down to DuckDB. Cursor values
//! are always bound as parameters, converted to the key column's type.

use super::engine::{
    column_types, key_value_for_column, key_value_to_duckdb, lock, SharedConnection,
};
use super::query::SqlQuery;
use crate::error::Result;
use crate::query::{AsyncQueryable, KeyBound, KeySelector, Queryable};
use crate::types::{CursorKey, SortOrder};
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection, Row};
use std::fmt;
use std::sync::Arc;

/// Maps one result row to an item
pub type RowMapper<T> = Arc<dyn Fn(&Row<'_>) -> duckdb::Result<T> + Send + Sync>;

/// Deferred query over a DuckDB relation
///
/// The key selector's `field` must name a column of the relation.
pub struct DuckDbSource<T> {
    conn: SharedConnection,
    query: SqlQuery,
    mapper: RowMapper<T>,
}

impl<T> DuckDbSource<T> {
    pub(crate) fn new(conn: SharedConnection, query: SqlQuery, mapper: RowMapper<T>) -> Self {
        Self {
            conn,
            query,
            mapper,
        }
    }

    /// The SELECT statement `fetch` would run
    pub fn sql(&self) -> String {
        self.query.select_sql()
    }

    /// The SQL query under construction
    pub fn query(&self) -> &SqlQuery {
        &self.query
    }

    fn with_query(mut self, f: impl FnOnce(&mut SqlQuery)) -> Self {
        f(&mut self.query);
        self
    }
}

impl<T> Clone for DuckDbSource<T> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            query: self.query.clone(),
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<T> fmt::Debug for DuckDbSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuckDbSource")
            .field("sql", &self.query.select_sql())
            .field("params", &self.query.params())
            .finish_non_exhaustive()
    }
}

/// Bound parameters, each converted to the type of the column it is compared with
fn bind_params(conn: &Connection, query: &SqlQuery) -> Result<Vec<Value>> {
    if query.params().is_empty() {
        return Ok(Vec::new());
    }

    let types = column_types(conn, query.relation_sql())?;
    query
        .bound_params()
        .map(|(field, value)| {
            let column = field.rsplit('.').next().unwrap_or(field).to_ascii_lowercase();
            match types.get(&column) {
                Some(column_type) => key_value_for_column(value, column_type),
                None => Ok(key_value_to_duckdb(value)),
            }
        })
        .collect()
}

fn fetch_rows<T>(
    conn: &SharedConnection,
    query: &SqlQuery,
    mapper: &RowMapper<T>,
) -> Result<Vec<T>> {
    let sql = query.select_sql();
    tracing::debug!("Executing query: {} {:?}", sql, query.params());

    let conn = lock(conn)?;
    let params = bind_params(&conn, query)?;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| mapper(row))?
        .collect::<duckdb::Result<Vec<T>>>()?;
    Ok(rows)
}

fn count_rows(conn: &SharedConnection, query: &SqlQuery) -> Result<u64> {
    let sql = query.count_sql();
    tracing::debug!("Executing query: {} {:?}", sql, query.params());

    let conn = lock(conn)?;
    let params = bind_params(&conn, query)?;
    let count: i64 = conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or_default())
}

impl<T: Send + 'static> Queryable<T> for DuckDbSource<T> {
    fn order_by<K: CursorKey>(self, key: &KeySelector<T, K>, order: SortOrder) -> Self {
        self.with_query(|query| query.order_by(key.field(), order))
    }

    fn filter_key<K: CursorKey>(self, key: &KeySelector<T, K>, bound: KeyBound<K>) -> Self {
        self.with_query(|query| query.filter(key.field(), bound.operator(), bound.key_value()))
    }

    fn skip(self, count: u64) -> Self {
        self.with_query(|query| query.skip(count))
    }

    fn take(self, count: u64) -> Self {
        self.with_query(|query| query.take(count))
    }

    fn fetch(&self) -> Result<Vec<T>> {
        fetch_rows(&self.conn, &self.query, &self.mapper)
    }

    fn count(&self) -> Result<u64> {
        count_rows(&self.conn, &self.query)
    }
}

#[async_trait]
impl<T: Send + 'static> AsyncQueryable<T> for DuckDbSource<T> {
    async fn fetch_async(&self) -> Result<Vec<T>> {
        let conn = Arc::clone(&self.conn);
        let query = self.query.clone();
        let mapper = Arc::clone(&self.mapper);
        tokio::task::spawn_blocking(move || fetch_rows(&conn, &query, &mapper)).await?
    }

    async fn count_async(&self) -> Result<u64> {
        let conn = Arc::clone(&self.conn);
        let query = self.query.clone();
        tokio::task::spawn_blocking(move || count_rows(&conn, &query)).await?
    }
}
