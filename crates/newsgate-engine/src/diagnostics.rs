//! Per-window and per-category counters, and the sink they are reported to.
//!
//! Reporting is advisory: sinks observe counts after the fact and have no
//! way to influence which records are accepted.

use newsgate_core::{CategoryTag, TimeWindow};
use serde::Serialize;

/// Classification counts for one (category, window) batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowStats {
    pub seen: usize,
    pub malformed: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Accepted by the classifier, then dropped by shadow suppression.
    pub suppressed: usize,
}

/// Dedup counts for one category after all windows are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub input: usize,
    pub exact_removed: usize,
    pub near_removed: usize,
    pub output: usize,
}

pub trait DiagnosticsSink {
    fn window_processed(&self, category: &CategoryTag, window: &TimeWindow, stats: &WindowStats);

    fn dedup_completed(&self, category: &CategoryTag, stats: &DedupStats);
}

/// Emits one structured `tracing` event per report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn window_processed(&self, category: &CategoryTag, window: &TimeWindow, stats: &WindowStats) {
        tracing::info!(
            category = %category,
            window = %window,
            seen = stats.seen,
            malformed = stats.malformed,
            accepted = stats.accepted,
            rejected = stats.rejected,
            suppressed = stats.suppressed,
            "window classified"
        );
    }

    fn dedup_completed(&self, category: &CategoryTag, stats: &DedupStats) {
        tracing::info!(
            category = %category,
            input = stats.input,
            exact_removed = stats.exact_removed,
            near_removed = stats.near_removed,
            output = stats.output,
            "category deduplicated"
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn window_processed(&self, _: &CategoryTag, _: &TimeWindow, _: &WindowStats) {}

    fn dedup_completed(&self, _: &CategoryTag, _: &DedupStats) {}
}
