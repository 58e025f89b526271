//! Loader for Nsight Systems MPI trace CSV exports.
//!
//! An nsys export begins with free-form preamble lines (tool banner, report
//! name, sometimes a UTF-8 BOM) before the actual CSV header. This adapter
//! scans for the header line, parses the rows that follow, and normalizes
//! them into a validated `Trace` for one rank.

use crate::trace::{Event, Trace};
use crate::utils::config::NSYS_HEADER_KEY;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One data row of the nsys CSV export
///
/// Extra columns in the export are ignored; only the interval endpoints and
/// the event name matter here. Duration is derived from the endpoints rather
/// than trusted from the file.
#[derive(Debug, Deserialize)]
struct NsysRecord {
    #[serde(rename = "Start (ns)")]
    start_ns: f64,

    #[serde(rename = "End (ns)")]
    end_ns: f64,

    #[serde(rename = "Event")]
    event: String,
}

/// Load one rank's trace from an nsys CSV export
///
/// **Public** - the trace-loading entry point used by commands
///
/// The rank id is taken from the file stem, e.g. `rank_03.csv` -> `rank_03`.
///
/// # Errors
/// * `ParseError::IoError` - file cannot be read
/// * `ParseError::MissingHeader` - no nsys CSV header line in the file
/// * `ParseError::CsvError` - a data row fails to parse
/// * `ParseError::MalformedTrace` - an event violates `start <= end` or has
///   a non-finite timestamp
pub fn load_trace(path: impl AsRef<Path>) -> Result<Trace, ParseError> {
    let path = path.as_ref();
    let rank_id = rank_id_from_path(path);

    debug!("Loading trace for rank '{}' from {}", rank_id, path.display());

    let content = fs::read_to_string(path)?;
    let body = strip_preamble(&content)
        .ok_or_else(|| ParseError::MissingHeader(path.display().to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut events = Vec::new();
    for record in reader.deserialize::<NsysRecord>() {
        let record = record?;
        events.push(Event::new(record.event, record.start_ns, record.end_ns));
    }

    if events.is_empty() {
        warn!("Trace for rank '{}' contains no events", rank_id);
    }

    Trace::new(rank_id, events)
}

/// Slice off everything before the CSV header line
///
/// **Private** - internal helper for load_trace
///
/// Returns `None` when no header line is present. Tolerates a BOM and
/// leading whitespace on the header line itself.
fn strip_preamble(content: &str) -> Option<&str> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_start_matches('\u{feff}').trim().starts_with(NSYS_HEADER_KEY) {
            return Some(&content[offset..]);
        }
        offset += line.len();
    }
    None
}

/// Derive the rank identifier from the trace file name
///
/// **Private** - internal helper for load_trace
fn rank_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const EXPORT: &str = "\
Generating report...
Exported 3 rows

Start (ns),End (ns),Duration (ns),Event
0,10,10,MPI_Init
10,50,40,MPI_File_read_at_all
50,60,10,MPI_File_close
";

    #[test]
    fn test_load_skips_preamble() {
        let file = write_file(EXPORT);
        let trace = load_trace(file.path()).unwrap();

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.events()[0].category, "MPI_Init");
        assert_eq!(trace.events()[1].start_ns, 10.0);
        assert_eq!(trace.events()[1].duration_ns, 40.0);
    }

    #[test]
    fn test_load_without_preamble() {
        let file = write_file("Start (ns),End (ns),Duration (ns),Event\n5,15,10,MPI_Barrier\n");
        let trace = load_trace(file.path()).unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_load_with_bom() {
        let file = write_file("\u{feff}Start (ns),End (ns),Duration (ns),Event\n0,1,1,MPI_Init\n");
        let trace = load_trace(file.path()).unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_missing_header_is_error() {
        let file = write_file("just some text\nwith no header\n");
        assert!(matches!(
            load_trace(file.path()),
            Err(ParseError::MissingHeader(_))
        ));
    }

    #[test]
    fn test_malformed_row_is_error() {
        let file = write_file("Start (ns),End (ns),Duration (ns),Event\n50,10,40,MPI_Init\n");
        assert!(matches!(
            load_trace(file.path()),
            Err(ParseError::MalformedTrace { .. })
        ));
    }

    #[test]
    fn test_empty_body_is_valid_empty_trace() {
        let file = write_file("Start (ns),End (ns),Duration (ns),Event\n");
        let trace = load_trace(file.path()).unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_rank_id_from_file_stem() {
        assert_eq!(rank_id_from_path(Path::new("/tmp/out/rank_03.csv")), "rank_03");
    }

    #[test]
    fn test_strip_preamble_finds_header_mid_file() {
        let body = strip_preamble(EXPORT).unwrap();
        assert!(body.starts_with("Start (ns),End (ns)"));
    }
}
