//! Per-rank phase table writer.
//!
//! The per-rank table is the durable artifact of an analysis run: one CSV
//! row per rank, keyed by rank name, suitable for spreadsheets and plotting
//! scripts.

use crate::parser::schema::RankPhaseRow;
use crate::utils::error::OutputError;
use log::info;
use std::path::Path;

/// Write the per-rank phase table as CSV
///
/// **Public** - main entry point for table output
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path or path is a directory
/// * `OutputError::CsvFailed` - serialization or write failure
pub fn write_rank_table(
    rows: &[RankPhaseRow],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let mut writer = csv::Writer::from_path(output_path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Per-rank table written to {} ({} ranks)",
        output_path.display(),
        rows.len()
    );

    Ok(())
}

/// Read a per-rank table back from CSV
///
/// **Public** - useful for validation and testing
pub fn read_rank_table(input_path: impl AsRef<Path>) -> Result<Vec<RankPhaseRow>, OutputError> {
    let mut reader = csv::Reader::from_path(input_path.as_ref())?;
    let mut rows = Vec::new();
    for row in reader.deserialize::<RankPhaseRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Validate that the output path is usable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create missing parent directories for the output file
///
/// **Private** - internal helper
pub(super) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
