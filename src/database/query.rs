//! SQL composition for deferred queries
//!
//! Builder operations accumulate into a single SELECT. An order or filter
//! added after a slice wraps the current statement as a subquery, so the
//! operations keep the order they were added in.

use crate::error::{Error, Result};
use crate::guard;
use crate::types::{KeyValue, SortOrder};
use std::path::Path;

/// What a query selects from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// A table or view, optionally schema-qualified
    Table(String),
    /// A CSV file scanned in place
    Csv(String),
    /// A Parquet file scanned in place
    Parquet(String),
    /// A JSON or newline-delimited JSON file scanned in place
    Json(String),
}

impl Relation {
    /// Interpret a relation name: file paths by extension, anything else as a table
    pub fn parse(text: &str) -> Result<Self> {
        guard::not_empty(text, "relation")?;

        let extension = Path::new(text)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv" | "tsv") => Ok(Self::Csv(text.to_string())),
            Some("parquet") => Ok(Self::Parquet(text.to_string())),
            Some("json" | "jsonl" | "ndjson") => Ok(Self::Json(text.to_string())),
            _ if guard::is_identifier(text) => Ok(Self::Table(text.to_string())),
            _ => Err(Error::invalid_argument(
                "relation",
                format!("'{text}' is neither a table name nor a csv/parquet/json file"),
            )),
        }
    }

    /// FROM clause for this relation
    pub fn to_sql(&self) -> String {
        match self {
            Self::Table(name) => quote_identifier(name),
            Self::Csv(path) => format!("read_csv_auto({})", quote_literal(path)),
            Self::Parquet(path) => format!("read_parquet({})", quote_literal(path)),
            Self::Json(path) => format!("read_json_auto({})", quote_literal(path)),
        }
    }
}

/// Quote a (possibly dotted) identifier
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// A SELECT under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    relation: String,
    from: String,
    params: Vec<KeyValue>,
    param_fields: Vec<String>,
    filters: Vec<String>,
    orders: Vec<String>,
    limit: Option<u64>,
    offset: u64,
    depth: usize,
}

impl SqlQuery {
    /// Select every row of a relation
    pub fn new(relation: &Relation) -> Self {
        Self {
            relation: relation.to_sql(),
            from: relation.to_sql(),
            params: Vec::new(),
            param_fields: Vec::new(),
            filters: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: 0,
            depth: 0,
        }
    }

    fn is_sliced(&self) -> bool {
        self.limit.is_some() || self.offset > 0
    }

    fn nest(&mut self) {
        let inner = self.select_sql();
        self.depth += 1;
        self.from = format!("({inner}) AS page_{}", self.depth);
        self.filters.clear();
        self.limit = None;
        self.offset = 0;
    }

    /// Order by a column; the newest ordering takes precedence
    ///
    /// NULL sorts before every other key, matching `KeyValue` ordering.
    pub fn order_by(&mut self, field: &str, order: SortOrder) {
        if self.is_sliced() {
            self.nest();
        }
        let nulls = match order {
            SortOrder::Ascending => "NULLS FIRST",
            SortOrder::Descending => "NULLS LAST",
        };
        self.orders.insert(
            0,
            format!("{} {} {nulls}", quote_identifier(field), order.sql_keyword()),
        );
    }

    /// Keep rows whose column is strictly greater (`>`) or less (`<`) than a
    /// bound parameter
    ///
    /// NULL counts as smaller than every value: a `<` bound keeps NULL rows,
    /// a `>` bound on NULL keeps every non-NULL row, a `<` bound on NULL keeps
    /// nothing.
    pub fn filter(&mut self, field: &str, operator: &str, value: KeyValue) {
        if self.is_sliced() {
            self.nest();
        }
        let column = quote_identifier(field);
        let clause = match (operator, value.is_null()) {
            (">", true) => format!("{column} IS NOT NULL"),
            (_, true) => "FALSE".to_string(),
            ("<", false) => format!("({column} < ? OR {column} IS NULL)"),
            (_, false) => format!("{column} {operator} ?"),
        };
        if !value.is_null() {
            self.params.push(value);
            self.param_fields.push(field.to_string());
        }
        self.filters.push(clause);
    }

    /// Skip rows
    pub fn skip(&mut self, count: u64) {
        self.offset = self.offset.saturating_add(count);
        if let Some(limit) = self.limit {
            self.limit = Some(limit.saturating_sub(count));
        }
    }

    /// Keep at most `count` rows
    pub fn take(&mut self, count: u64) {
        self.limit = Some(self.limit.map_or(count, |limit| limit.min(count)));
    }

    /// Parameters in the order their placeholders appear
    pub fn params(&self) -> &[KeyValue] {
        &self.params
    }

    /// Parameters paired with the column each one is compared against
    pub fn bound_params(&self) -> impl Iterator<Item = (&str, &KeyValue)> {
        self.param_fields
            .iter()
            .map(String::as_str)
            .zip(self.params.iter())
    }

    /// FROM clause of the underlying relation, before any nesting
    pub fn relation_sql(&self) -> &str {
        &self.relation
    }

    /// The SELECT statement
    pub fn select_sql(&self) -> String {
        let mut sql = format!("SELECT * FROM {}", self.from);
        if !self.filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filters.join(" AND "));
        }
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orders.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }
        sql
    }

    /// A statement counting the rows the SELECT would return
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM ({}) AS counted", self.select_sql())
    }
}
