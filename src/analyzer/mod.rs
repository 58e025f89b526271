//! Trace decomposition and cross-rank aggregation.
//!
//! This module turns per-rank traces into:
//! - Five-bucket phase breakdowns (preprocessing, input, output, comm, comp)
//! - The active algorithm window between input close and output write
//! - Cross-rank summary statistics for scalability analysis

pub mod aggregate;
pub mod phases;
pub mod window;

// Re-export main types and functions
pub use aggregate::{aggregate, analyze_rank, RankAnalysis, SummaryReport};
pub use phases::{partition, PhaseBreakdown};
pub use window::{extract_active_window, time_in_window, ActiveWindow};
