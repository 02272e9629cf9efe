//! Query module
//!
//! The contract a data source must satisfy to be paginated, plus an
//! in-process implementation of it.
//!
//! # Overview
//!
//! A query is deferred: `order_by`, `filter_key`, `skip` and `take` only
//! record work. `fetch` (or `fetch_async`) materializes it. Keys are chosen
//! with a [`KeySelector`], which pairs an extraction function with the name
//! of the key at the store level so both in-process and push-down sources
//! can honor it.

mod memory;
mod types;

pub use memory::MemorySource;
pub use types::{AsyncQueryable, KeyBound, KeySelector, Queryable};
