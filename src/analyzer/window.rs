//! Active-phase window extraction.
//!
//! The window between the end of input I/O (first close after the first bulk
//! read) and the start of output I/O (first bulk write) is the rank's active
//! algorithm phase: the part of the run that actually scales with rank count.
//! This module locates that window and measures how much of a category set
//! falls entirely inside it.

use crate::trace::Trace;
use crate::utils::config::{BULK_READ_EVENT, BULK_WRITE_EVENT, CLOSE_EVENT, NS_PER_SEC};

/// The active algorithm window of one rank
///
/// Absent (`duration_s == 0`, both timestamps `None`) when the read or write
/// boundary is missing. When the located window is inverted
/// (`end <= start`) the duration is zero but the timestamps are kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveWindow {
    /// End of the first close after the first bulk read, in nanoseconds
    pub start_ns: Option<f64>,

    /// Start of the first bulk write, in nanoseconds
    pub end_ns: Option<f64>,

    /// Window length in seconds, 0 when absent or inverted
    pub duration_s: f64,
}

impl ActiveWindow {
    /// Whether the window exists and has positive length
    pub fn is_positive(&self) -> bool {
        self.duration_s > 0.0
    }
}

/// Locate the active window of one rank's trace
///
/// **Public** - paired with `partition` in per-rank analysis
pub fn extract_active_window(trace: &Trace) -> ActiveWindow {
    let Some(read_idx) = trace.first_occurrence(BULK_READ_EVENT, None) else {
        return ActiveWindow::default();
    };
    let Some(write_idx) = trace.first_occurrence(BULK_WRITE_EVENT, None) else {
        return ActiveWindow::default();
    };

    // The input phase is not over until the file is closed; without a close
    // after the read there is no well-defined window start.
    let Some(close_idx) = trace.first_occurrence(CLOSE_EVENT, Some(read_idx)) else {
        return ActiveWindow::default();
    };

    let start_ns = trace.events()[close_idx].end_ns;
    let end_ns = trace.events()[write_idx].start_ns;

    let duration_s = if end_ns <= start_ns {
        // Inverted window (write began before input finished closing).
        // Report zero length but keep the timestamps for diagnostics.
        0.0
    } else {
        (end_ns - start_ns) / NS_PER_SEC
    };

    ActiveWindow {
        start_ns: Some(start_ns),
        end_ns: Some(end_ns),
        duration_s,
    }
}

/// Total time of `categories` events lying entirely inside `[start_ns, end_ns]`
///
/// **Public** - used to attribute communication time to the active window
///
/// An event counts only when its whole `[start, end]` interval fits inside
/// the window, endpoints inclusive. Partially overlapping events are excluded
/// entirely rather than pro-rated; accuracy is bounded by event granularity.
pub fn time_in_window(trace: &Trace, categories: &[&str], start_ns: f64, end_ns: f64) -> f64 {
    trace
        .events()
        .iter()
        .filter(|e| categories.contains(&e.category.as_str()))
        .filter(|e| e.start_ns >= start_ns && e.end_ns <= end_ns)
        .map(|e| e.duration_ns)
        .sum::<f64>()
        / NS_PER_SEC
}
