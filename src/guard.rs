//! Argument guards
//!
//! Validation helpers shared by the paginators, key selectors and query
//! sources. Every guard runs before a query is touched.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Identifiers accepted for push-down fields and relations: `name` or `schema.name`
static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

/// Require a strictly positive number
pub fn greater_than_zero(value: u32, name: &str) -> Result<()> {
    if value < 1 {
        return Err(Error::out_of_range(name, "must be greater than zero"));
    }
    Ok(())
}

/// Require a non-blank string
pub fn not_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(name, "cannot be empty"));
    }
    Ok(())
}

/// Require a plain (optionally dotted) identifier
pub fn identifier(value: &str, name: &str) -> Result<()> {
    not_empty(value, name)?;
    if !IDENTIFIER_REGEX.is_match(value) {
        return Err(Error::invalid_argument(
            name,
            format!("'{value}' is not a valid identifier"),
        ));
    }
    Ok(())
}

/// Check whether a string is a valid identifier without building an error
pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_greater_than_zero() {
        assert!(greater_than_zero(1, "page").is_ok());
        assert!(greater_than_zero(u32::MAX, "page").is_ok());

        let err = greater_than_zero(0, "page_size").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument 'page_size' out of range: must be greater than zero"
        );
    }

    #[test]
    fn test_not_empty() {
        assert!(not_empty("id", "field").is_ok());
        assert!(not_empty("", "field").is_err());
        assert!(not_empty("   ", "field").is_err());
    }

    #[test_case("id" ; "simple")]
    #[test_case("created_at" ; "underscore")]
    #[test_case("main.products" ; "dotted")]
    #[test_case("_private1" ; "leading underscore")]
    fn test_identifier_accepts(value: &str) {
        assert!(identifier(value, "field").is_ok());
    }

    #[test_case("1abc" ; "leading digit")]
    #[test_case("id; DROP TABLE x" ; "injection")]
    #[test_case("a..b" ; "empty segment")]
    #[test_case("\"quoted\"" ; "quotes")]
    fn test_identifier_rejects(value: &str) {
        let err = identifier(value, "field").unwrap_err();
        assert!(err.is_argument_error());
    }
}
