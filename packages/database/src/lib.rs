#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB`-backed ranked neighborhood store.
//!
//! A single-file database with one `neighborhoods` table, fully replaced
//! on every scoring pass. One writer per process; readers during a write
//! get last-writer-wins semantics, which is fine for a single-user
//! dashboard.

pub mod store;

pub use duckdb::Connection;
pub use store::{
    ALL_COUNTIES, CountyStats, county_stats, open, open_in_memory, query_all, query_filtered,
    replace_all,
};

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
