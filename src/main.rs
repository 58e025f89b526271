//! MPI Phase Trace CLI
//!
//! Derives a phase-time breakdown (preprocessing, input/output I/O,
//! communication, computation) of a distributed MPI job from per-rank
//! nsys CSV trace exports, and aggregates it into scalability metrics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use mpi_phase_trace::commands::{execute_analyze, validate_args, AnalyzeArgs};
use mpi_phase_trace::utils::config::SCHEMA_VERSION;

/// MPI Phase Trace - phase breakdown for distributed job traces
#[derive(Parser, Debug)]
#[command(name = "mpi-phase")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a directory of per-rank trace exports
    Analyze {
        /// Directory containing one nsys CSV export per rank
        #[arg(short, long, default_value = "nsys_csv")]
        input: PathBuf,

        /// Output path for the per-rank phase table (CSV)
        #[arg(short, long, default_value = "phase_by_rank.csv")]
        table: PathBuf,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Print aggregated summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            table,
            json,
            summary,
        } => {
            let args = AnalyzeArgs {
                input_dir: input,
                output_table: table,
                output_json: json,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute analysis
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a report JSON file
///
/// **Private** - internal command implementation
fn validate_report_file(file_path: PathBuf) -> Result<()> {
    use mpi_phase_trace::output::read_report;

    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Ranks: {}", report.rank_count);
    println!("  Total wall-time: {:.6}s", report.summary.total_wall_s);
    println!("  Active phase wall-time: {:.6}s", report.summary.active_wall_s);

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("MPI Phase Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Phase-time breakdown for per-rank MPI traces (nsys CSV exports).");
}
