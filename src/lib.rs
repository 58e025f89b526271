//! MPI Phase Trace
//!
//! Phase-time breakdown and scalability metrics for distributed MPI jobs,
//! derived from per-rank Nsight Systems CSV trace exports.
//!
//! This crate provides the core implementation for the `mpi-phase` CLI tool:
//! trace loading, per-rank phase partitioning, active-window extraction, and
//! cross-rank aggregation.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! mpi-phase analyze --input nsys_csv --table phase_by_rank.csv
//! ```

pub mod analyzer;
pub mod commands;
pub mod output;
pub mod parser;
pub mod trace;
pub mod utils;
