//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Discovers per-rank CSV exports in the input directory
//! 2. Loads each file into a validated trace (malformed ranks are skipped)
//! 3. Partitions each rank into phase buckets and extracts its active window
//! 4. Aggregates per-rank results into cross-rank statistics
//! 5. Writes the per-rank table, and optionally a JSON report
//! 6. Prints a human-readable summary

use crate::analyzer::{aggregate, analyze_rank, RankAnalysis, SummaryReport};
use crate::output::{write_rank_table, write_report};
use crate::parser::schema::{AnalysisReport, RankPhaseRow};
use crate::parser::load_trace;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory containing one CSV export per rank
    pub input_dir: PathBuf,

    /// Output path for the per-rank phase table (CSV)
    pub output_table: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print the aggregated summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("nsys_csv"),
            output_table: PathBuf::from("phase_by_rank.csv"),
            output_json: None,
            print_summary: false,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * No readable trace files in the input directory
/// * Every discovered file failed to load (empty input set)
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Analyzing traces under {}", args.input_dir.display());

    // Step 1: Discover per-rank CSV files
    let files = discover_trace_files(&args.input_dir)
        .with_context(|| format!("Failed to list {}", args.input_dir.display()))?;
    if files.is_empty() {
        anyhow::bail!("No CSV files found under {}", args.input_dir.display());
    }
    info!("Step 1/4: Found {} trace files", files.len());

    // Step 2: Load and analyze each rank. A malformed trace only excludes
    // that rank; the run continues for the others.
    info!("Step 2/4: Loading and partitioning ranks...");
    let mut ranks: Vec<RankAnalysis> = Vec::with_capacity(files.len());
    let mut skipped = 0usize;
    for file in &files {
        match load_trace(file) {
            Ok(trace) => {
                debug!("Loaded {} events from {}", trace.len(), file.display());
                ranks.push(analyze_rank(&trace));
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!("{} of {} trace files were skipped", skipped, files.len());
    }

    // Step 3: Cross-rank aggregation
    info!("Step 3/4: Aggregating {} ranks...", ranks.len());
    let summary = aggregate(&ranks).context("Cannot aggregate")?;

    // Step 4: Outputs
    info!("Step 4/4: Writing output files...");
    let rows: Vec<RankPhaseRow> = ranks
        .iter()
        .map(|r| RankPhaseRow::new(&r.rank_id, &r.breakdown))
        .collect();

    write_rank_table(&rows, &args.output_table)
        .context("Failed to write per-rank table")?;
    info!("✓ Per-rank table: {}", args.output_table.display());

    if let Some(json_path) = &args.output_json {
        let report = build_report(rows.clone(), summary.clone());
        write_report(&report, json_path).context("Failed to write JSON report")?;
        info!("✓ JSON report: {}", json_path.display());
    }

    if args.print_summary {
        print_summary(&summary);
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// List CSV files under the input directory, sorted by file name
///
/// **Private** - internal helper for execute_analyze
///
/// Sorting fixes the rank order of the output table regardless of directory
/// enumeration order.
fn discover_trace_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Assemble the versioned JSON report
///
/// **Private** - internal helper for execute_analyze
fn build_report(rows: Vec<RankPhaseRow>, summary: SummaryReport) -> AnalysisReport {
    use chrono::Utc;

    AnalysisReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        rank_count: rows.len(),
        ranks: rows,
        summary,
    }
}

/// Print the aggregated metrics block to stdout
///
/// **Private** - internal helper for execute_analyze
fn print_summary(summary: &SummaryReport) {
    println!("\n=== Aggregated Metrics (seconds) ===");
    println!("Preprocessing  (mean/max)       : {:.6} / {:.6}", summary.pre_mean_s, summary.pre_max_s);
    println!("Input I/O      (mean over ranks): {:.6}", summary.input_mean_s);
    println!("Output I/O     (mean over ranks): {:.6}", summary.output_mean_s);
    println!(
        "Computation    (mean/max/min)   : {:.6} / {:.6} / {:.6}",
        summary.comp_mean_s, summary.comp_max_s, summary.comp_min_s
    );
    println!("Communication  (mean over ranks): {:.6}", summary.comm_mean_s);
    println!("Total job wall-time             : {:.6}", summary.total_wall_s);
    println!("Active phase wall-time          : {:.6}  (read close -> write start)", summary.active_wall_s);
    match summary.active_comm_mean_s {
        Some(mean) => println!(
            "Active phase mean COMM time     : {:.6}  (over {} ranks)",
            mean, summary.active_comm_ranks
        ),
        None => println!("Active phase mean COMM time     : no data (no rank had a positive window)"),
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if !args.input_dir.exists() {
        anyhow::bail!("Input directory does not exist: {}", args.input_dir.display());
    }

    if !args.input_dir.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", args.input_dir.display());
    }

    if args.output_table.as_os_str().is_empty() {
        anyhow::bail!("Output table path cannot be empty");
    }

    Ok(())
}
