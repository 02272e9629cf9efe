//! Common types used throughout Solidafy Paginate
//!
//! This module contains shared type definitions, type aliases,
//! and the cursor key abstraction used by every query source.

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Sort Order
// ============================================================================

/// Direction in which a paginated sequence is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest key first
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    /// Largest key first
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortOrder {
    /// Check if this is ascending order
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// The opposite direction
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// SQL keyword for this direction
    pub fn sql_keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(Error::invalid_argument(
                "order",
                format!("expected 'asc' or 'desc', got '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Key Values
// ============================================================================

/// Source-neutral representation of a cursor key
///
/// Query sources that push filters down to a store (e.g. DuckDB) bind this
/// value as a statement parameter; URL builders render it with `Display`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// Missing value
    Null,
    /// Signed integer
    Int(i64),
    /// Unsigned integer that does not fit in `i64`
    UInt(u64),
    /// Point in time
    Timestamp(DateTime<Utc>),
    /// Free-form text
    Text(String),
}

impl KeyValue {
    /// Parse a key from its textual form (query strings, CLI arguments)
    ///
    /// Integers win over timestamps, timestamps (RFC 3339) over plain text.
    /// Text keys such as `"007"` do not survive this; DuckDB sources bind
    /// `KeyValue::Text` against the column type instead.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(u) = trimmed.parse::<u64>() {
            return Self::UInt(u);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::Timestamp(ts.with_timezone(&Utc));
        }
        Self::Text(text.to_string())
    }

    /// Extract a key from a JSON value
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Text(n.to_string())
                }
            }
            JsonValue::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Check if this is the null key
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Cursor Keys
// ============================================================================

/// A totally ordered value usable as a pagination cursor
///
/// The key is used in-process (sorting and filtering materialized items,
/// reading the next cursor off the last item) and, through [`KeyValue`],
/// by sources that push the cursor bound down to a store.
pub trait CursorKey: Ord + Clone + fmt::Debug + Send + Sync + 'static {
    /// Convert into the source-neutral representation
    fn to_key_value(&self) -> KeyValue;

    /// Convert back from the source-neutral representation
    fn from_key_value(value: KeyValue) -> Result<Self>;

    /// Parse a cursor received as text
    fn parse_cursor(text: &str) -> Result<Self> {
        Self::from_key_value(KeyValue::parse(text))
    }
}

macro_rules! impl_signed_cursor_key {
    ($($t:ty),*) => {$(
        impl CursorKey for $t {
            fn to_key_value(&self) -> KeyValue {
                KeyValue::Int(i64::from(*self))
            }

            fn from_key_value(value: KeyValue) -> Result<Self> {
                match value {
                    KeyValue::Int(i) => <$t>::try_from(i)
                        .map_err(|e| Error::invalid_cursor(i.to_string(), e.to_string())),
                    KeyValue::UInt(u) => <$t>::try_from(u)
                        .map_err(|e| Error::invalid_cursor(u.to_string(), e.to_string())),
                    KeyValue::Text(s) => s
                        .trim()
                        .parse::<$t>()
                        .map_err(|e| Error::invalid_cursor(s.as_str(), e.to_string())),
                    other => Err(Error::invalid_cursor(
                        other.to_string(),
                        concat!("expected ", stringify!($t)),
                    )),
                }
            }
        }
    )*};
}

macro_rules! impl_unsigned_cursor_key {
    ($($t:ty),*) => {$(
        impl CursorKey for $t {
            fn to_key_value(&self) -> KeyValue {
                match i64::try_from(*self) {
                    Ok(i) => KeyValue::Int(i),
                    Err(_) => KeyValue::UInt(u64::from(*self)),
                }
            }

            fn from_key_value(value: KeyValue) -> Result<Self> {
                match value {
                    KeyValue::Int(i) => <$t>::try_from(i)
                        .map_err(|e| Error::invalid_cursor(i.to_string(), e.to_string())),
                    KeyValue::UInt(u) => <$t>::try_from(u)
                        .map_err(|e| Error::invalid_cursor(u.to_string(), e.to_string())),
                    KeyValue::Text(s) => s
                        .trim()
                        .parse::<$t>()
                        .map_err(|e| Error::invalid_cursor(s.as_str(), e.to_string())),
                    other => Err(Error::invalid_cursor(
                        other.to_string(),
                        concat!("expected ", stringify!($t)),
                    )),
                }
            }
        }
    )*};
}

impl_signed_cursor_key!(i32, i64);
impl_unsigned_cursor_key!(u32, u64);

impl CursorKey for String {
    fn to_key_value(&self) -> KeyValue {
        KeyValue::Text(self.clone())
    }

    fn from_key_value(value: KeyValue) -> Result<Self> {
        match value {
            KeyValue::Null => Err(Error::invalid_cursor("null", "expected text")),
            KeyValue::Text(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }

    fn parse_cursor(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl CursorKey for DateTime<Utc> {
    fn to_key_value(&self) -> KeyValue {
        KeyValue::Timestamp(*self)
    }

    fn from_key_value(value: KeyValue) -> Result<Self> {
        match value {
            KeyValue::Timestamp(ts) => Ok(ts),
            KeyValue::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| Error::invalid_cursor(s.as_str(), e.to_string())),
            KeyValue::Int(secs) => DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| Error::invalid_cursor(secs.to_string(), "timestamp out of range")),
            other => Err(Error::invalid_cursor(other.to_string(), "expected timestamp")),
        }
    }
}

impl CursorKey for KeyValue {
    fn to_key_value(&self) -> KeyValue {
        self.clone()
    }

    fn from_key_value(value: KeyValue) -> Result<Self> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case("asc", SortOrder::Ascending ; "short ascending")]
    #[test_case("Descending", SortOrder::Descending ; "long descending")]
    #[test_case(" DESC ", SortOrder::Descending ; "padded upper")]
    fn test_sort_order_from_str(input: &str, expected: SortOrder) {
        assert_eq!(input.parse::<SortOrder>().unwrap(), expected);
    }

    #[test]
    fn test_sort_order_rejects_unknown() {
        let err = "sideways".parse::<SortOrder>().unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_sort_order_serde() {
        let order: SortOrder = serde_json::from_str("\"descending\"").unwrap();
        assert_eq!(order, SortOrder::Descending);
        assert_eq!(serde_json::to_string(&SortOrder::Ascending).unwrap(), "\"asc\"");
        assert_eq!(SortOrder::Ascending.reverse(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.sql_keyword(), "DESC");
    }

    #[test]
    fn test_key_value_parse() {
        assert_eq!(KeyValue::parse("42"), KeyValue::Int(42));
        assert_eq!(KeyValue::parse("-7"), KeyValue::Int(-7));
        assert_eq!(
            KeyValue::parse("18446744073709551615"),
            KeyValue::UInt(u64::MAX)
        );
        assert_eq!(
            KeyValue::parse("2024-03-01T12:00:00Z"),
            KeyValue::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(KeyValue::parse("abc"), KeyValue::Text("abc".to_string()));
    }

    #[test]
    fn test_key_value_from_json() {
        assert_eq!(KeyValue::from_json(&serde_json::json!(7)), KeyValue::Int(7));
        assert_eq!(
            KeyValue::from_json(&serde_json::json!("x")),
            KeyValue::Text("x".to_string())
        );
        assert!(KeyValue::from_json(&JsonValue::Null).is_null());
    }

    #[test]
    fn test_key_value_display() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(KeyValue::Timestamp(ts).to_string(), "2024-03-01T12:00:00Z");
        assert_eq!(KeyValue::Int(10).to_string(), "10");
    }

    #[test]
    fn test_integer_cursor_keys() {
        assert_eq!(i32::parse_cursor("20").unwrap(), 20);
        assert_eq!(u64::parse_cursor("0").unwrap(), 0);
        assert_eq!(i64::from_key_value(KeyValue::Text(" 5 ".to_string())).unwrap(), 5);
        assert_eq!(u64::MAX.to_key_value(), KeyValue::UInt(u64::MAX));

        let err = i32::parse_cursor("abc").unwrap_err();
        assert!(matches!(err, Error::InvalidCursor { .. }));

        let err = u32::parse_cursor("-1").unwrap_err();
        assert!(matches!(err, Error::InvalidCursor { .. }));
    }

    #[test]
    fn test_string_cursor_keeps_text() {
        assert_eq!(String::parse_cursor("0042").unwrap(), "0042");
        assert_eq!(
            String::from_key_value(KeyValue::Int(3)).unwrap(),
            "3".to_string()
        );
    }

    #[test]
    fn test_timestamp_cursor_key() {
        let ts = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let parsed = DateTime::<Utc>::parse_cursor(&ts.to_key_value().to_string()).unwrap();
        assert_eq!(parsed, ts);
    }
}
