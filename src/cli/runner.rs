//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PageArgs};
use crate::config::{load_config, PaginationConfig};
use crate::database::{json_key, DatabaseEngine, DuckDbSource};
use crate::error::{Result, ResultExt};
use crate::pagination::{
    AsyncPaginator, CursorPage, CursorPaginator, SimplePaginator, SizeAwarePaginator,
};
use crate::query::Queryable;
use crate::transform::ResultTransformer;
use crate::types::{JsonObject, KeyValue};
use futures::TryStreamExt;
use serde::Serialize;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let engine = self.open_database()?;

        match &self.cli.command {
            Commands::Tables => self.tables(&engine),
            Commands::Page(args) => self.page(&engine, &config, args).await,
            Commands::Sized(args) => self.sized(&engine, &config, args).await,
            Commands::Cursor {
                table,
                key,
                cursor,
                page_size,
                order,
                all,
            } => {
                // Typed against the key column when bound
                let cursor = cursor.as_deref().map(|c| KeyValue::Text(c.to_string()));
                let params = config.cursor_params(cursor, *page_size, *order)?;
                let source = engine.json_rows(table)?;
                let paginator = CursorPaginator::new(json_key(key)?);

                if *all {
                    let mut pages = std::pin::pin!(paginator.traverse(source, params));
                    while let Some(page) = pages.try_next().await? {
                        self.output_cursor_page(&config, page)?;
                    }
                    Ok(())
                } else {
                    let page = paginator.paginate_async(source, &params).await?;
                    self.output_cursor_page(&config, page)
                }
            }
        }
    }

    /// Load pagination config, applying command-line overrides
    fn load_config(&self) -> Result<PaginationConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => PaginationConfig::default(),
        };
        if let Some(base_url) = &self.cli.base_url {
            config.links.base_url.clone_from(base_url);
        }
        Ok(config)
    }

    /// Open the database file, or an in-memory database for file relations
    fn open_database(&self) -> Result<DatabaseEngine> {
        match &self.cli.database {
            Some(path) => DatabaseEngine::open(path),
            None => DatabaseEngine::open_in_memory(),
        }
    }

    /// Build the JSON row source for a page-number command
    fn ordered_rows(
        engine: &DatabaseEngine,
        config: &PaginationConfig,
        args: &PageArgs,
    ) -> Result<DuckDbSource<JsonObject>> {
        let source = engine.json_rows(&args.table)?;
        match &args.order_by {
            Some(column) => {
                let order = args.order.unwrap_or(config.order);
                Ok(source.order_by(&json_key(column)?, order))
            }
            None => Ok(source),
        }
    }

    /// List tables
    fn tables(&self, engine: &DatabaseEngine) -> Result<()> {
        let tables = engine
            .list_tables()
            .with_context(|| format!("Failed to list tables in {}", engine.location()))?;
        tracing::debug!("Found {} tables in {}", tables.len(), engine.location());
        self.output(&tables)
    }

    /// Fetch one page without totals
    async fn page(
        &self,
        engine: &DatabaseEngine,
        config: &PaginationConfig,
        args: &PageArgs,
    ) -> Result<()> {
        let params = config.page_params(args.page, args.page_size)?;
        let source = Self::ordered_rows(engine, config, args)?;
        let page =
            AsyncPaginator::<JsonObject, _>::paginate_async(&SimplePaginator, source, &params)
                .await?;

        if config.links.base_url.is_empty() {
            self.output(&page)
        } else {
            self.output(&config.simple_transformer()?.transform(page))
        }
    }

    /// Fetch one page with totals
    async fn sized(
        &self,
        engine: &DatabaseEngine,
        config: &PaginationConfig,
        args: &PageArgs,
    ) -> Result<()> {
        let params = config.page_params(args.page, args.page_size)?;
        let source = Self::ordered_rows(engine, config, args)?;
        let page =
            AsyncPaginator::<JsonObject, _>::paginate_async(&SizeAwarePaginator, source, &params)
                .await?;

        if config.links.base_url.is_empty() {
            self.output(&page)
        } else {
            self.output(&config.size_aware_transformer()?.transform(page))
        }
    }

    /// Output a cursor page, with links when a base URL is configured
    fn output_cursor_page(
        &self,
        config: &PaginationConfig,
        page: CursorPage<JsonObject, KeyValue>,
    ) -> Result<()> {
        if config.links.base_url.is_empty() {
            self.output(&page)
        } else {
            self.output(&config.cursor_transformer()?.transform(page))
        }
    }

    /// Output a document
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
