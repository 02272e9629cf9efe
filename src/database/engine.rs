//! DuckDB-based database engine
//!
//! Owns a shared DuckDB connection and hands out query sources over its
//! tables and over CSV/Parquet/JSON files DuckDB scans in place.

use super::query::{Relation, SqlQuery};
use super::source::DuckDbSource;
use crate::error::{Error, Result};
use crate::query::KeySelector;
use crate::types::{JsonObject, KeyValue};
use chrono::{DateTime, NaiveDateTime};
use duckdb::types::{TimeUnit, Value};
use duckdb::{Connection, Row};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared DuckDB connection
pub(crate) type SharedConnection = Arc<Mutex<Connection>>;

/// Lock a shared connection
pub(crate) fn lock(conn: &SharedConnection) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::Other("DuckDB connection lock poisoned".to_string()))
}

/// Database query engine using DuckDB
#[derive(Clone)]
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: SharedConnection,
    /// Database location (for logging)
    location: String,
}

impl std::fmt::Debug for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseEngine")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl DatabaseEngine {
    /// Open an existing database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!(
                "Failed to open DuckDB database {}: {e}",
                path.display()
            ))
        })?;

        tracing::debug!("Opened DuckDB database {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: path.display().to_string(),
        })
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: ":memory:".to_string(),
        })
    }

    /// Where the database lives
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Run one or more statements that return no rows
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("Executing batch: {}", sql);
        lock(&self.conn)?.execute_batch(sql)?;
        Ok(())
    }

    /// Get list of tables in the database
    ///
    /// Tables in the default schema are listed bare, others schema-qualified.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let query = "SELECT CASE WHEN table_schema = 'main' THEN table_name
                            ELSE table_schema || '.' || table_name END AS full_name
                     FROM information_schema.tables
                     WHERE table_schema NOT IN ('information_schema', 'pg_catalog')
                     ORDER BY table_schema, table_name";

        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(query)?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;

        Ok(tables)
    }

    /// Query source over a relation, mapping each row with `mapper`
    pub fn source<T, F>(&self, relation: &str, mapper: F) -> Result<DuckDbSource<T>>
    where
        F: Fn(&Row<'_>) -> duckdb::Result<T> + Send + Sync + 'static,
    {
        let relation = Relation::parse(relation)?;
        Ok(DuckDbSource::new(
            Arc::clone(&self.conn),
            SqlQuery::new(&relation),
            Arc::new(mapper),
        ))
    }

    /// Query source over a relation yielding every row as a JSON object
    pub fn json_rows(&self, relation: &str) -> Result<DuckDbSource<JsonObject>> {
        self.source(relation, row_to_json)
    }
}

/// Convert a row into a JSON object keyed by column name
pub fn row_to_json(row: &Row<'_>) -> duckdb::Result<JsonObject> {
    let names = row.as_ref().column_names();
    let mut object = JsonObject::new();
    for (idx, name) in names.into_iter().enumerate() {
        let value: Value = row.get(idx)?;
        object.insert(name, duckdb_value_to_json(value));
    }
    Ok(object)
}

/// Key selector reading a column of a JSON row
///
/// Missing columns read as the null key.
pub fn json_key(column: &str) -> Result<KeySelector<JsonObject, KeyValue>> {
    let name = column.to_string();
    KeySelector::new(column, move |row: &JsonObject| {
        row.get(&name).map_or(KeyValue::Null, KeyValue::from_json)
    })
}

/// Convert a cursor key into a bindable DuckDB value
pub fn key_value_to_duckdb(key: &KeyValue) -> Value {
    match key {
        KeyValue::Null => Value::Null,
        KeyValue::Int(i) => Value::BigInt(*i),
        KeyValue::UInt(u) => Value::UBigInt(*u),
        KeyValue::Timestamp(ts) => Value::Timestamp(TimeUnit::Microsecond, ts.timestamp_micros()),
        KeyValue::Text(s) => Value::Text(s.clone()),
    }
}

/// Column types of a relation, keyed by lower-cased column name
pub(crate) fn column_types(
    conn: &Connection,
    relation_sql: &str,
) -> Result<HashMap<String, String>> {
    let sql = format!("DESCRIBE SELECT * FROM {relation_sql}");
    tracing::debug!("Executing query: {}", sql);

    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<duckdb::Result<Vec<_>>>()?;
    Ok(columns
        .into_iter()
        .map(|(name, column_type)| (name.to_ascii_lowercase(), column_type))
        .collect())
}

/// Convert a cursor key into a value comparable with a column of `column_type`
///
/// Cursors arriving as text (query strings, the CLI) are parsed against the
/// column: `"007"` stays text for a VARCHAR key and becomes `7` for a BIGINT key.
/// Unknown column types fall back to [`key_value_to_duckdb`].
#[allow(clippy::cast_precision_loss)]
pub fn key_value_for_column(key: &KeyValue, column_type: &str) -> Result<Value> {
    let column_type = column_type.to_ascii_uppercase();
    let base = column_type
        .split(|c: char| c == '(' || c == ' ')
        .next()
        .unwrap_or_default();

    let mismatch = || Error::invalid_cursor(key.to_string(), format!("not a {column_type} value"));

    match (base, key) {
        (_, KeyValue::Null) => Ok(Value::Null),
        ("VARCHAR" | "TEXT" | "STRING" | "CHAR" | "BPCHAR" | "UUID", _) => {
            Ok(Value::Text(key.to_string()))
        }
        (
            "TINYINT" | "SMALLINT" | "INTEGER" | "BIGINT" | "HUGEINT" | "UTINYINT" | "USMALLINT"
            | "UINTEGER" | "UBIGINT" | "UHUGEINT",
            _,
        ) => match key {
            KeyValue::Int(i) => Ok(Value::BigInt(*i)),
            KeyValue::UInt(u) => Ok(Value::UBigInt(*u)),
            KeyValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::BigInt)
                .or_else(|_| s.trim().parse::<u64>().map(Value::UBigInt))
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ("FLOAT" | "DOUBLE" | "REAL" | "DECIMAL" | "NUMERIC", _) => match key {
            KeyValue::Int(i) => Ok(Value::Double(*i as f64)),
            KeyValue::UInt(u) => Ok(Value::Double(*u as f64)),
            KeyValue::Text(s) => s.trim().parse::<f64>().map(Value::Double).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        (timestamp, _) if timestamp.starts_with("TIMESTAMP") => {
            let micros = match key {
                KeyValue::Timestamp(ts) => ts.timestamp_micros(),
                KeyValue::Int(secs) => secs.saturating_mul(1_000_000),
                KeyValue::Text(s) => parse_timestamp(s.trim()).ok_or_else(mismatch)?,
                _ => return Err(mismatch()),
            };
            Ok(Value::Timestamp(TimeUnit::Microsecond, micros))
        }
        _ => Ok(key_value_to_duckdb(key)),
    }
}

/// Parse RFC 3339 or DuckDB's own timestamp text, as UTC microseconds
fn parse_timestamp(text: &str) -> Option<i64> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.timestamp_micros());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|ts| ts.and_utc().timestamp_micros())
}

fn timestamp_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

/// Convert DuckDB Value to JSON Value
pub fn duckdb_value_to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(b),
        Value::TinyInt(i) => JsonValue::Number(i.into()),
        Value::SmallInt(i) => JsonValue::Number(i.into()),
        Value::Int(i) => JsonValue::Number(i.into()),
        Value::BigInt(i) => JsonValue::Number(i.into()),
        Value::HugeInt(i) => JsonValue::String(i.to_string()),
        Value::UTinyInt(i) => JsonValue::Number(i.into()),
        Value::USmallInt(i) => JsonValue::Number(i.into()),
        Value::UInt(i) => JsonValue::Number(i.into()),
        Value::UBigInt(i) => JsonValue::Number(i.into()),
        Value::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        Value::Double(f) => {
            serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
        }
        Value::Text(s) => JsonValue::String(s),
        Value::Timestamp(unit, i) => {
            let micros = timestamp_micros(unit, i);
            chrono::DateTime::from_timestamp_micros(micros)
                .map(|dt| JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
                .unwrap_or(JsonValue::Number(i.into()))
        }
        Value::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
                .map(|date| JsonValue::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(JsonValue::Number(d.into()))
        }
        Value::Time64(_, t) => {
            // Microseconds since midnight
            let secs = t / 1_000_000;
            let micros = t % 1_000_000;
            JsonValue::String(format!(
                "{:02}:{:02}:{:02}.{:06}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                micros
            ))
        }
        other => JsonValue::String(format!("{other:?}")),
    }
}
