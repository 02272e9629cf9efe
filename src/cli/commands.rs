//! CLI commands and argument parsing

use crate::types::SortOrder;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginate DuckDB tables and data files from the command line
#[derive(Parser, Debug)]
#[command(name = "solidafy-paginate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// DuckDB database file (in-memory when omitted)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Pagination configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL for navigation links (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tables in the database
    Tables,

    /// Fetch one page by number, without totals
    Page(PageArgs),

    /// Fetch one page by number, with item and page totals
    Sized(PageArgs),

    /// Fetch pages by cursor
    Cursor {
        /// Table name or csv/parquet/json file
        #[arg(short, long)]
        table: String,

        /// Column to order and resume by
        #[arg(short, long)]
        key: String,

        /// Resume after this key value
        #[arg(long)]
        cursor: Option<String>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Traversal order (asc or desc)
        #[arg(long)]
        order: Option<SortOrder>,

        /// Keep fetching until the last page, one JSON document per page
        #[arg(long)]
        all: bool,
    },
}

/// Arguments shared by page-number commands
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Table name or csv/parquet/json file
    #[arg(short, long)]
    pub table: String,

    /// 1-based page number
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Column to order by before slicing
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort order for --order-by (asc or desc, defaults to the configured order)
    #[arg(long)]
    pub order: Option<SortOrder>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}
