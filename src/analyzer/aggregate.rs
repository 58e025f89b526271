//! Cross-rank aggregation of per-rank analysis results.
//!
//! A pure reduction: per-rank breakdowns and windows fold into a fixed-shape
//! summary (means, plus max/min for the load-imbalance buckets) and a single
//! global wall span from the earliest start to the latest end across ranks.

use super::phases::{partition, PhaseBreakdown};
use super::window::{extract_active_window, time_in_window, ActiveWindow};
use crate::trace::Trace;
use crate::utils::config::{COMM_EVENTS, NS_PER_SEC};
use crate::utils::error::AnalysisError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Everything the aggregator needs from one rank
///
/// Produced by `analyze_rank`; the aggregation itself never touches the
/// underlying trace again.
#[derive(Debug, Clone)]
pub struct RankAnalysis {
    /// Rank identifier, carried through to the per-rank table
    pub rank_id: String,

    /// Five-bucket phase breakdown
    pub breakdown: PhaseBreakdown,

    /// Active algorithm window (may be absent)
    pub window: ActiveWindow,

    /// Communication time fully inside the active window, 0 when the window
    /// is absent or has zero length
    pub window_comm_s: f64,

    /// Earliest event start, `None` for an empty trace
    pub min_start_ns: Option<f64>,

    /// Latest event end, `None` for an empty trace
    pub max_end_ns: Option<f64>,
}

/// Run the full per-rank analysis: partition + window + in-window comm
///
/// **Public** - the single per-rank entry point used by commands
pub fn analyze_rank(trace: &Trace) -> RankAnalysis {
    let breakdown = partition(trace);
    let window = extract_active_window(trace);

    let window_comm_s = match (window.start_ns, window.end_ns) {
        (Some(start), Some(end)) if window.is_positive() => {
            time_in_window(trace, COMM_EVENTS, start, end)
        }
        _ => 0.0,
    };

    debug!(
        "Rank '{}': wall={:.6}s comp={:.6}s window={:.6}s",
        trace.rank_id(),
        breakdown.wall_s,
        breakdown.comp_s,
        window.duration_s
    );

    RankAnalysis {
        rank_id: trace.rank_id().to_string(),
        breakdown,
        window,
        window_comm_s,
        min_start_ns: trace.min_start_ns(),
        max_end_ns: trace.max_end_ns(),
    }
}

/// Cross-rank summary statistics, all values in seconds
///
/// Preprocessing max and computation max/min exist alongside the means
/// because preprocessing overhead and computation imbalance are the two
/// load-imbalance diagnostics; the other buckets only need their means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub pre_mean_s: f64,
    pub pre_max_s: f64,
    pub input_mean_s: f64,
    pub output_mean_s: f64,
    pub comm_mean_s: f64,
    pub comp_mean_s: f64,
    pub comp_max_s: f64,
    pub comp_min_s: f64,

    /// Whole-job wall time: latest end minus earliest start over all ranks
    pub total_wall_s: f64,

    /// Active-phase wall time: max window duration over ranks
    pub active_wall_s: f64,

    /// Mean in-window communication over ranks with a positive window;
    /// `None` when no rank had one (no data, not a zero average)
    pub active_comm_mean_s: Option<f64>,

    /// Number of ranks contributing to `active_comm_mean_s`
    pub active_comm_ranks: usize,
}

/// Reduce per-rank results into the cross-rank summary
///
/// **Public** - the final step of an analysis run
///
/// # Errors
/// * `AnalysisError::EmptyInputSet` - no ranks, or every rank's trace was
///   empty; the global wall span is undefined in either case
pub fn aggregate(ranks: &[RankAnalysis]) -> Result<SummaryReport, AnalysisError> {
    let min_start = ranks
        .iter()
        .filter_map(|r| r.min_start_ns)
        .fold(None, |acc: Option<f64>, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        });
    let max_end = ranks
        .iter()
        .filter_map(|r| r.max_end_ns)
        .fold(None, |acc: Option<f64>, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        });

    let (Some(min_start), Some(max_end)) = (min_start, max_end) else {
        return Err(AnalysisError::EmptyInputSet);
    };

    let n = ranks.len() as f64;
    let mean = |f: fn(&PhaseBreakdown) -> f64| -> f64 {
        ranks.iter().map(|r| f(&r.breakdown)).sum::<f64>() / n
    };
    let fold_max = |f: fn(&PhaseBreakdown) -> f64| -> f64 {
        ranks.iter().map(|r| f(&r.breakdown)).fold(0.0, f64::max)
    };

    let comp_min_s = ranks
        .iter()
        .map(|r| r.breakdown.comp_s)
        .fold(f64::INFINITY, f64::min);

    // Ranks with an absent window contribute 0 to the max.
    let active_wall_s = ranks
        .iter()
        .map(|r| r.window.duration_s)
        .fold(0.0, f64::max);

    let window_ranks: Vec<&RankAnalysis> =
        ranks.iter().filter(|r| r.window.is_positive()).collect();
    let active_comm_mean_s = if window_ranks.is_empty() {
        None
    } else {
        Some(
            window_ranks.iter().map(|r| r.window_comm_s).sum::<f64>()
                / window_ranks.len() as f64,
        )
    };

    Ok(SummaryReport {
        pre_mean_s: mean(|b| b.pre_s),
        pre_max_s: fold_max(|b| b.pre_s),
        input_mean_s: mean(|b| b.input_s),
        output_mean_s: mean(|b| b.output_s),
        comm_mean_s: mean(|b| b.comm_s),
        comp_mean_s: mean(|b| b.comp_s),
        comp_max_s: fold_max(|b| b.comp_s),
        comp_min_s,
        total_wall_s: (max_end - min_start) / NS_PER_SEC,
        active_wall_s,
        active_comm_mean_s,
        active_comm_ranks: window_ranks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Event;

    fn trace(rank: &str, events: Vec<Event>) -> Trace {
        Trace::new(rank, events).unwrap()
    }

    fn full_trace(rank: &str, offset: f64) -> Trace {
        trace(
            rank,
            vec![
                Event::new("MPI_Init", offset, offset + 10.0),
                Event::new("MPI_File_read_at_all", offset + 10.0, offset + 50.0),
                Event::new("MPI_File_close", offset + 50.0, offset + 60.0),
                Event::new("MPI_Barrier", offset + 60.0, offset + 70.0),
                Event::new("MPI_File_write_at_all", offset + 70.0, offset + 120.0),
                Event::new("MPI_File_close", offset + 120.0, offset + 130.0),
            ],
        )
    }

    #[test]
    fn test_global_wall_span_across_ranks() {
        // rank1 spans [0, 100], rank2 spans [20, 150]
        let r1 = analyze_rank(&trace("r1", vec![Event::new("MPI_Barrier", 0.0, 100.0)]));
        let r2 = analyze_rank(&trace("r2", vec![Event::new("MPI_Barrier", 20.0, 150.0)]));

        let summary = aggregate(&[r1, r2]).unwrap();
        assert_eq!(summary.total_wall_s, 150.0 / NS_PER_SEC);
    }

    #[test]
    fn test_empty_input_set_is_fatal() {
        assert!(matches!(
            aggregate(&[]),
            Err(AnalysisError::EmptyInputSet)
        ));
    }

    #[test]
    fn test_all_empty_traces_is_fatal() {
        let r = analyze_rank(&trace("r0", vec![]));
        assert!(matches!(
            aggregate(&[r]),
            Err(AnalysisError::EmptyInputSet)
        ));
    }

    #[test]
    fn test_min_mean_max_bounds() {
        let ranks: Vec<RankAnalysis> = (0..4)
            .map(|i| analyze_rank(&full_trace(&format!("r{i}"), i as f64 * 7.0)))
            .collect();
        let summary = aggregate(&ranks).unwrap();

        assert!(summary.comp_min_s <= summary.comp_mean_s);
        assert!(summary.comp_mean_s <= summary.comp_max_s);
        assert!(summary.pre_mean_s <= summary.pre_max_s);
        for r in &ranks {
            assert!(summary.total_wall_s >= r.breakdown.wall_s);
        }
    }

    #[test]
    fn test_rank_without_write_contributes_zero_window() {
        let with_window = analyze_rank(&full_trace("r0", 0.0));
        let without_write = analyze_rank(&trace(
            "r1",
            vec![
                Event::new("MPI_File_read_at_all", 0.0, 40.0),
                Event::new("MPI_File_close", 40.0, 50.0),
                Event::new("MPI_Barrier", 50.0, 60.0),
            ],
        ));

        assert!(!without_write.window.is_positive());

        let summary = aggregate(&[with_window.clone(), without_write]).unwrap();
        assert_eq!(summary.active_wall_s, with_window.window.duration_s);
        assert_eq!(summary.active_comm_ranks, 1);
    }

    #[test]
    fn test_active_comm_mean_over_window_ranks_only() {
        let r0 = analyze_rank(&full_trace("r0", 0.0));
        let r1 = analyze_rank(&trace("r1", vec![Event::new("MPI_Barrier", 0.0, 10.0)]));

        let summary = aggregate(&[r0, r1]).unwrap();
        // Only r0 has a window; its in-window comm is the 10ns barrier.
        assert_eq!(summary.active_comm_mean_s, Some(10.0 / NS_PER_SEC));
        assert_eq!(summary.active_comm_ranks, 1);
    }

    #[test]
    fn test_no_window_ranks_flags_no_data() {
        let r = analyze_rank(&trace("r0", vec![Event::new("MPI_Barrier", 0.0, 10.0)]));
        let summary = aggregate(&[r]).unwrap();

        assert_eq!(summary.active_comm_mean_s, None);
        assert_eq!(summary.active_comm_ranks, 0);
        assert_eq!(summary.active_wall_s, 0.0);
    }

    #[test]
    fn test_means_over_all_ranks() {
        let r0 = analyze_rank(&full_trace("r0", 0.0));
        let r1 = analyze_rank(&trace("r1", vec![Event::new("MPI_Barrier", 0.0, 30.0)]));

        let summary = aggregate(&[r0, r1]).unwrap();
        // comm: (10 + 30) / 2 ranks
        assert!((summary.comm_mean_s - 20.0 / NS_PER_SEC).abs() < 1e-15);
        // input: (50 + 0) / 2
        assert_eq!(summary.input_mean_s, 25.0 / NS_PER_SEC);
    }
}
