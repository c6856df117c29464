//! Adapter implementations
//!
//! Adapters bind the core to concrete technologies:
//! - DuckDB for the account store and transaction log
//! - A file lock for the single-process guarantee

pub mod duckdb;
pub mod lockfile;
