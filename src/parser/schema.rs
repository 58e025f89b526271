//! Output schema definitions for analysis results.
//!
//! This module defines the structures persisted to disk: the per-rank phase
//! table (CSV) and the versioned JSON report. Schema is versioned to allow
//! future evolution.

use crate::analyzer::{PhaseBreakdown, SummaryReport};
use serde::{Deserialize, Serialize};

/// One row of the per-rank phase table, all durations in seconds
///
/// Degraded ranks (missing boundary events) appear here with their fallback
/// values so a reviewer can see which ranks lacked which boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankPhaseRow {
    /// Rank identifier (source file stem)
    pub rank: String,

    /// Preprocessing time
    pub pre_s: f64,

    /// Input I/O time
    pub input_s: f64,

    /// Output I/O time
    pub output_s: f64,

    /// Communication time
    pub comm_s: f64,

    /// Computation time
    pub comp_s: f64,

    /// Rank wall span
    pub wall_s: f64,
}

impl RankPhaseRow {
    /// Build a table row from a rank's breakdown
    pub fn new(rank: impl Into<String>, breakdown: &PhaseBreakdown) -> Self {
        Self {
            rank: rank.into(),
            pre_s: breakdown.pre_s,
            input_s: breakdown.input_s,
            output_s: breakdown.output_s,
            comm_s: breakdown.comm_s,
            comp_s: breakdown.comp_s,
            wall_s: breakdown.wall_s,
        }
    }
}

/// Top-level analysis report written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// Number of ranks included in the aggregate
    pub rank_count: usize,

    /// Per-rank phase breakdown rows
    pub ranks: Vec<RankPhaseRow>,

    /// Cross-rank summary statistics
    pub summary: SummaryReport,
}
