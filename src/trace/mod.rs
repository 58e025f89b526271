//! Normalized per-rank event traces.
//!
//! A `Trace` is the immutable, start-ordered sequence of timestamped events
//! recorded for one rank. Everything downstream (phase partitioning, window
//! extraction, aggregation) consumes traces read-only.

use crate::utils::error::ParseError;

/// One timestamped interval from a rank's trace
///
/// Invariants (enforced by `Trace::new`): `start_ns <= end_ns`, all
/// timestamps finite, `duration_ns = end_ns - start_ns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Category label, e.g. "MPI_File_read_at_all" or "MPI_Send"
    pub category: String,

    /// Start timestamp in nanoseconds
    pub start_ns: f64,

    /// End timestamp in nanoseconds
    pub end_ns: f64,

    /// Duration in nanoseconds (end - start)
    pub duration_ns: f64,
}

impl Event {
    /// Build an event with the duration derived from its endpoints
    pub fn new(category: impl Into<String>, start_ns: f64, end_ns: f64) -> Self {
        Self {
            category: category.into(),
            start_ns,
            end_ns,
            duration_ns: end_ns - start_ns,
        }
    }
}

/// One rank's trace: events sorted by start time, stable on ties
///
/// Construction validates the per-event invariants; a trace that fails them
/// is rejected as a whole (`ParseError::MalformedTrace`) so downstream
/// arithmetic never sees negative durations or NaN timestamps.
#[derive(Debug, Clone)]
pub struct Trace {
    rank_id: String,
    events: Vec<Event>,
}

impl Trace {
    /// Validate and sort events into a trace for one rank
    ///
    /// # Errors
    /// * `ParseError::MalformedTrace` - an event has `start > end` or a
    ///   non-finite timestamp
    pub fn new(rank_id: impl Into<String>, mut events: Vec<Event>) -> Result<Self, ParseError> {
        let rank_id = rank_id.into();

        for event in &events {
            if !event.start_ns.is_finite() || !event.end_ns.is_finite() {
                return Err(ParseError::MalformedTrace {
                    rank: rank_id,
                    reason: format!("non-finite timestamp in event '{}'", event.category),
                });
            }
            if event.start_ns > event.end_ns {
                return Err(ParseError::MalformedTrace {
                    rank: rank_id,
                    reason: format!(
                        "event '{}' ends before it starts ({} > {})",
                        event.category, event.start_ns, event.end_ns
                    ),
                });
            }
        }

        // Stable sort: equal-start events keep their original relative order,
        // which fixes which one counts as "first" for boundary lookups.
        events.sort_by(|a, b| {
            a.start_ns
                .partial_cmp(&b.start_ns)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(Self { rank_id, events })
    }

    /// Rank identifier (typically the source file stem)
    pub fn rank_id(&self) -> &str {
        &self.rank_id
    }

    /// Events in start order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Index of the first event with the given category, optionally
    /// restricted to indices strictly greater than `after`
    ///
    /// Returns `None` when no match exists; callers treat absence as a valid
    /// outcome (a missing boundary), never as an error.
    pub fn first_occurrence(&self, category: &str, after: Option<usize>) -> Option<usize> {
        let from = after.map_or(0, |i| i + 1);
        self.events
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, e)| e.category == category)
            .map(|(i, _)| i)
    }

    /// Earliest start over all events, `None` for an empty trace
    pub fn min_start_ns(&self) -> Option<f64> {
        // Events are start-sorted, the first one is the minimum.
        self.events.first().map(|e| e.start_ns)
    }

    /// Latest end over all events, `None` for an empty trace
    pub fn max_end_ns(&self) -> Option<f64> {
        self.events
            .iter()
            .map(|e| e.end_ns)
            .fold(None, |acc, end| match acc {
                Some(m) if m >= end => Some(m),
                _ => Some(end),
            })
    }

    /// Wall span in nanoseconds: max(end) - min(start), 0 for an empty trace
    pub fn wall_span_ns(&self) -> f64 {
        match (self.min_start_ns(), self.max_end_ns()) {
            (Some(min), Some(max)) => max - min,
            _ => 0.0,
        }
    }

    /// Sum of durations of all events whose category is in `categories`
    pub fn sum_durations_ns(&self, categories: &[&str]) -> f64 {
        self.events
            .iter()
            .filter(|e| categories.contains(&e.category.as_str()))
            .map(|e| e.duration_ns)
            .sum()
    }
}
