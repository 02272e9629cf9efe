//! Configuration types for pagination defaults
//!
//! Pagination defaults and link settings are loaded from YAML:
//!
//! ```yaml
//! page_size: 25
//! max_page_size: 100
//! order: desc
//! links:
//!   base_url: https://api.example.com/products
//!   page_param: p
//!   include_total_pages: true
//! ```

use crate::error::{Error, Result};
use crate::guard;
use crate::pagination::{CursorParams, PageParams, DEFAULT_PAGE_SIZE};
use crate::transform::{
    CursorUrlTransformer, LinkBuilder, SimpleUrlTransformer, SizeAwareUrlTransformer,
    DEFAULT_CURSOR_PARAM, DEFAULT_PAGE_PARAM, DEFAULT_PAGE_SIZE_PARAM,
};
use crate::types::{CursorKey, SortOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Pagination configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when a request gives none
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Largest page size a request may ask for
    #[serde(default)]
    pub max_page_size: Option<u32>,

    /// Default traversal order for cursor pagination
    #[serde(default)]
    pub order: SortOrder,

    /// Navigation link settings
    #[serde(default)]
    pub links: LinksConfig,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
            order: SortOrder::Ascending,
            links: LinksConfig::default(),
        }
    }
}

// ============================================================================
// Links Config
// ============================================================================

/// Settings for navigation URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Base URL links are built on; empty for relative links
    #[serde(default)]
    pub base_url: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the page size
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,

    /// Query parameter carrying the cursor
    #[serde(default = "default_cursor_param")]
    pub cursor_param: String,

    /// Add the total item count to size-aware links
    #[serde(default)]
    pub include_total_items: bool,

    /// Add the total page count to size-aware links
    #[serde(default)]
    pub include_total_pages: bool,
}

fn default_page_param() -> String {
    DEFAULT_PAGE_PARAM.to_string()
}

fn default_page_size_param() -> String {
    DEFAULT_PAGE_SIZE_PARAM.to_string()
}

fn default_cursor_param() -> String {
    DEFAULT_CURSOR_PARAM.to_string()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            page_param: default_page_param(),
            page_size_param: default_page_size_param(),
            cursor_param: default_cursor_param(),
            include_total_items: false,
            include_total_pages: false,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a pagination config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<PaginationConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a pagination config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<PaginationConfig> {
    let config: PaginationConfig = serde_yaml::from_str(yaml)?;

    config.validate()?;
    Ok(config)
}

impl PaginationConfig {
    /// Check the config is internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }

        if let Some(max) = self.max_page_size {
            if max < self.page_size {
                return Err(Error::config(format!(
                    "max_page_size ({max}) cannot be smaller than page_size ({})",
                    self.page_size
                )));
            }
        }

        for (name, value) in [
            ("links.page_param", &self.links.page_param),
            ("links.page_size_param", &self.links.page_size_param),
            ("links.cursor_param", &self.links.cursor_param),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{name} cannot be empty")));
            }
        }

        Ok(())
    }

    /// Page size for a request: the default when absent, clamped to the maximum
    pub fn resolve_page_size(&self, requested: Option<u32>) -> Result<u32> {
        let page_size = requested.unwrap_or(self.page_size);
        guard::greater_than_zero(page_size, "page_size")?;

        match self.max_page_size {
            Some(max) if page_size > max => {
                tracing::warn!(
                    requested = page_size,
                    max_page_size = max,
                    "Page size exceeds maximum, clamping"
                );
                Ok(max)
            }
            _ => Ok(page_size),
        }
    }

    /// Page-number parameters for a request
    pub fn page_params(&self, page: Option<u32>, page_size: Option<u32>) -> Result<PageParams> {
        let params = PageParams::new(page.unwrap_or(1), self.resolve_page_size(page_size)?);
        params.validate()?;
        Ok(params)
    }

    /// Cursor parameters for a request
    pub fn cursor_params<K: CursorKey>(
        &self,
        cursor: Option<K>,
        page_size: Option<u32>,
        order: Option<SortOrder>,
    ) -> Result<CursorParams<K>> {
        Ok(CursorParams {
            page_size: self.resolve_page_size(page_size)?,
            cursor,
            order: order.unwrap_or(self.order),
        })
    }

    /// Link builder configured from the `links` section
    pub fn link_builder(&self) -> Result<LinkBuilder> {
        let links = &self.links;
        LinkBuilder::new(links.base_url.clone())?
            .rename_param(DEFAULT_PAGE_PARAM, links.page_param.clone())?
            .rename_param(DEFAULT_PAGE_SIZE_PARAM, links.page_size_param.clone())?
            .rename_param(DEFAULT_CURSOR_PARAM, links.cursor_param.clone())
    }

    /// Transformer for pages without totals
    pub fn simple_transformer(&self) -> Result<SimpleUrlTransformer> {
        Ok(SimpleUrlTransformer::with_links(self.link_builder()?))
    }

    /// Transformer for pages with totals
    pub fn size_aware_transformer(&self) -> Result<SizeAwareUrlTransformer> {
        let mut transformer = SizeAwareUrlTransformer::with_links(self.link_builder()?);
        if self.links.include_total_items {
            transformer = transformer.include_total_items();
        }
        if self.links.include_total_pages {
            transformer = transformer.include_total_pages();
        }
        Ok(transformer)
    }

    /// Transformer for cursor pages
    pub fn cursor_transformer(&self) -> Result<CursorUrlTransformer> {
        Ok(CursorUrlTransformer::with_links(self.link_builder()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SizedPage;
    use crate::transform::ResultTransformer;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_minimal_config() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, PaginationConfig::default());
        assert_eq!(config.links.page_param, "page");
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
page_size: 25
max_page_size: 100
order: desc
links:
  base_url: https://api.example.com/products
  page_param: p
  page_size_param: per_page
  cursor_param: after
  include_total_pages: true
"#;

        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_page_size, Some(100));
        assert_eq!(config.order, SortOrder::Descending);
        assert_eq!(config.links.cursor_param, "after");
        assert!(config.links.include_total_pages);
        assert!(!config.links.include_total_items);
    }

    #[test]
    fn test_reject_zero_page_size() {
        let err = load_config_from_str("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size must be greater than zero"));
    }

    #[test]
    fn test_reject_max_below_default() {
        let err = load_config_from_str("page_size: 50\nmax_page_size: 10").unwrap_err();
        assert!(err.to_string().contains("max_page_size"));
    }

    #[test]
    fn test_reject_invalid_yaml() {
        let err = load_config_from_str("page_size: [").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
        assert!(err.to_string().starts_with("Failed to parse YAML"));
    }

    #[test]
    fn test_reject_unknown_order() {
        let err = load_config_from_str("order: sideways").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size: 15").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.page_size, 15);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/pagination.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_resolve_page_size() {
        let config = PaginationConfig {
            page_size: 20,
            max_page_size: Some(50),
            ..Default::default()
        };

        assert_eq!(config.resolve_page_size(None).unwrap(), 20);
        assert_eq!(config.resolve_page_size(Some(30)).unwrap(), 30);
        assert_eq!(config.resolve_page_size(Some(500)).unwrap(), 50);
        assert!(matches!(
            config.resolve_page_size(Some(0)).unwrap_err(),
            Error::OutOfRange { .. }
        ));
    }

    #[test]
    fn test_page_and_cursor_params() {
        let config = load_config_from_str("page_size: 5\norder: desc").unwrap();

        let params = config.page_params(None, None).unwrap();
        assert_eq!(params, PageParams::new(1, 5));
        assert!(config.page_params(Some(0), None).is_err());

        let cursor = config.cursor_params(Some(42_i64), Some(8), None).unwrap();
        assert_eq!(cursor.page_size, 8);
        assert_eq!(cursor.cursor, Some(42));
        assert_eq!(cursor.order, SortOrder::Descending);
    }

    #[test]
    fn test_configured_links() {
        let yaml = r#"
links:
  base_url: https://api.example.com/products
  page_param: p
  include_total_items: true
"#;
        let config = load_config_from_str(yaml).unwrap();
        let page = SizedPage {
            items: vec![1, 2],
            page: 1,
            page_size: 2,
            total_items: 4,
            total_pages: 2,
        };

        let result = config.size_aware_transformer().unwrap().transform(page);
        assert_eq!(
            result.next_page_url,
            Some("https://api.example.com/products?p=2&pageSize=2&totalItems=4".to_string())
        );
    }
}
