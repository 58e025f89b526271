//! Trace loading and output schema definitions.
//!
//! This module handles:
//! - Loading nsys CSV exports into normalized traces
//! - Defining the persisted output schema (per-rank table, JSON report)

pub mod nsys_csv;
pub mod schema;

// Re-export main types
pub use nsys_csv::load_trace;
pub use schema::{AnalysisReport, RankPhaseRow};
