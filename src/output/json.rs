//! JSON report writer.
//!
//! Writes AnalysisReport structs to JSON files with proper formatting.

use crate::parser::schema::AnalysisReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write an analysis report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_report(
    report: &AnalysisReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    if output_path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }
    if output_path.exists() && output_path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            output_path.display()
        )));
    }

    super::table::create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!("Report written to {}", output_path.display());

    Ok(())
}

/// Read an analysis report from a JSON file
///
/// **Public** - used by the validate command and tests
pub fn read_report(input_path: impl AsRef<Path>) -> Result<AnalysisReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: AnalysisReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} ranks",
        report.version, report.rank_count
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SummaryReport;
    use crate::parser::schema::RankPhaseRow;
    use tempfile::NamedTempFile;

    fn create_test_report() -> AnalysisReport {
        AnalysisReport {
            version: "1.0.0".to_string(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            rank_count: 1,
            ranks: vec![RankPhaseRow {
                rank: "rank_00".to_string(),
                pre_s: 0.1,
                input_s: 0.2,
                output_s: 0.3,
                comm_s: 0.4,
                comp_s: 1.0,
                wall_s: 2.0,
            }],
            summary: SummaryReport {
                pre_mean_s: 0.1,
                pre_max_s: 0.1,
                input_mean_s: 0.2,
                output_mean_s: 0.3,
                comm_mean_s: 0.4,
                comp_mean_s: 1.0,
                comp_max_s: 1.0,
                comp_min_s: 1.0,
                total_wall_s: 2.0,
                active_wall_s: 0.5,
                active_comm_mean_s: Some(0.05),
                active_comm_ranks: 1,
            },
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.rank_count, 1);
        assert_eq!(loaded.summary, report.summary);
    }

    #[test]
    fn test_no_data_comm_round_trips_as_null() {
        let mut report = create_test_report();
        report.summary.active_comm_mean_s = None;
        report.summary.active_comm_ranks = 0;

        let temp_file = NamedTempFile::new().unwrap();
        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.summary.active_comm_mean_s, None);
    }

    #[test]
    fn test_write_report_empty_path() {
        let report = create_test_report();
        assert!(write_report(&report, Path::new("")).is_err());
    }
}
