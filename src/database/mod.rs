//! Query sources backed by DuckDB
//!
//! DuckDB serves both its own database files and CSV/Parquet/JSON files it
//! scans in place. Ordering, cursor filters and slicing are pushed down as
//! SQL, with cursor values bound as parameters of the key column's type.

mod engine;
mod query;
mod source;

pub use engine::{
    duckdb_value_to_json, json_key, key_value_for_column, key_value_to_duckdb, row_to_json,
    DatabaseEngine,
};
pub use query::{quote_identifier, Relation, SqlQuery};
pub use source::{DuckDbSource, RowMapper};
