//! Phase partitioning of a single rank's trace.
//!
//! Splits one rank's wall-clock span into five non-overlapping time buckets:
//! preprocessing, input I/O, output I/O, communication, and computation.
//! Bucket boundaries are located positionally: the first bulk read and first
//! bulk write act as the input/output phase anchors, each paired with the
//! first file close that follows it.

use crate::trace::Trace;
use crate::utils::config::{
    BULK_READ_EVENT, BULK_WRITE_EVENT, CLOSE_EVENT, COMM_EVENTS, INIT_EVENTS, NS_PER_SEC,
};
use log::debug;

/// Per-rank phase-time breakdown, all values in seconds
///
/// Invariant: every bucket is non-negative and
/// `comp_s = max(0, wall_s - (pre_s + input_s + output_s + comm_s))`.
/// Communication is summed over the whole trace independently of the I/O
/// windows, so it can double-count I/O that is internally composed of
/// communication primitives; computation floors at zero in that case.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseBreakdown {
    /// Time before the first bulk read (setup, data generation)
    pub pre_s: f64,

    /// First bulk read plus the close that follows it
    pub input_s: f64,

    /// First bulk write plus the close that follows it
    pub output_s: f64,

    /// All communication-primitive time across the whole trace
    pub comm_s: f64,

    /// Remainder of the wall span, floored at zero
    pub comp_s: f64,

    /// Rank wall span: max(end) - min(start)
    pub wall_s: f64,
}

/// Partition one rank's trace into the five phase buckets
///
/// **Public** - main entry point for per-rank analysis
///
/// An empty trace yields an all-zero breakdown. A trace without a bulk read
/// falls back to counting initialization events (MPI_Init, MPI_File_open) as
/// preprocessing; a trace without a bulk write simply has a zero output
/// bucket. Missing boundaries degrade, they never fail.
pub fn partition(trace: &Trace) -> PhaseBreakdown {
    if trace.is_empty() {
        debug!("Rank '{}' has an empty trace", trace.rank_id());
        return PhaseBreakdown::default();
    }

    let wall_ns = trace.wall_span_ns();
    let read_idx = trace.first_occurrence(BULK_READ_EVENT, None);

    let pre_ns = preprocessing_ns(trace, read_idx);
    let input_ns = io_phase_ns(trace, read_idx);
    let output_ns = io_phase_ns(trace, trace.first_occurrence(BULK_WRITE_EVENT, None));
    let comm_ns = trace.sum_durations_ns(COMM_EVENTS);

    // Computation is the unattributed remainder. The four buckets above can
    // overrun the wall span when communication double-counts I/O internals,
    // so floor at zero rather than report a negative phase.
    let comp_ns = (wall_ns - (pre_ns + input_ns + output_ns + comm_ns)).max(0.0);

    PhaseBreakdown {
        pre_s: pre_ns / NS_PER_SEC,
        input_s: input_ns / NS_PER_SEC,
        output_s: output_ns / NS_PER_SEC,
        comm_s: comm_ns / NS_PER_SEC,
        comp_s: comp_ns / NS_PER_SEC,
        wall_s: wall_ns / NS_PER_SEC,
    }
}

/// Preprocessing time: everything that starts before the first bulk read
///
/// **Private** - internal helper for partition
///
/// Events within one rank are assumed non-overlapping, so a flat duration
/// sum is a valid measure of occupied time.
fn preprocessing_ns(trace: &Trace, read_idx: Option<usize>) -> f64 {
    match read_idx {
        Some(ridx) => {
            let read_start = trace.events()[ridx].start_ns;
            trace
                .events()
                .iter()
                .filter(|e| e.start_ns < read_start)
                .map(|e| e.duration_ns)
                .sum()
        }
        None => {
            // Rare: the trace never performs a bulk read. Count explicit
            // initialization events instead of silently reporting zero.
            debug!(
                "Rank '{}' has no {} event, falling back to init events for preprocessing",
                trace.rank_id(),
                BULK_READ_EVENT
            );
            trace.sum_durations_ns(INIT_EVENTS)
        }
    }
}

/// Input or output bucket: the anchor event plus the first close after it
///
/// **Private** - internal helper for partition
fn io_phase_ns(trace: &Trace, anchor_idx: Option<usize>) -> f64 {
    let Some(idx) = anchor_idx else {
        return 0.0;
    };

    let mut total = trace.events()[idx].duration_ns;
    if let Some(close_idx) = trace.first_occurrence(CLOSE_EVENT, Some(idx)) {
        total += trace.events()[close_idx].duration_ns;
    }
    total
}
