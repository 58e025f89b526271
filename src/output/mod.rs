//! Output writers for analysis results.
//!
//! This module handles writing data to disk:
//! - Per-rank phase table (CSV, the durable artifact)
//! - Versioned JSON report (per-rank rows + summary)

pub mod json;
pub mod table;

// Re-export main functions
pub use json::{read_report, write_report};
pub use table::{read_rank_table, write_rank_table};
