//! CLI module
//!
//! Command-line interface for paginating DuckDB tables and data files.
//!
//! # Commands
//!
//! - `tables` - List tables in the database
//! - `page` - Fetch one page by number
//! - `sized` - Fetch one page by number with totals
//! - `cursor` - Fetch pages by cursor, optionally walking to the end

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PageArgs};
pub use runner::Runner;
