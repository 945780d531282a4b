//! Human-readable run summary.

use super::{format_bytes, ByteUnits};
use crate::duplicates::RunStats;

/// Build the summary lines for a finished run.
///
/// Always five lines (elapsed, seen, checked, duplicates, wasted), plus
/// one more when entries had to be skipped.
#[must_use]
pub fn summary_lines(stats: &RunStats, units: ByteUnits) -> Vec<String> {
    let mut lines = vec![
        format!("Scan took: {:.3?}", stats.elapsed()),
        format!("Seen files: {}", stats.seen_files),
        format!("Checked files (above minimum size): {}", stats.filtered_files),
        format!(
            "Duplicate files: {} in {} groups",
            stats.duplicate_files, stats.duplicate_groups
        ),
        format!("Wasted space: {}", format_bytes(stats.wasted_space, units)),
    ];

    if stats.skipped_total() > 0 {
        lines.push(format!(
            "Skipped unreadable entries: {} stat, {} hash, {} directory",
            stats.stat_failures, stats.hash_failures, stats.walk_errors
        ));
    }

    lines
}

/// Write the run summary to the log at info level (skips at warn).
pub fn log_summary(stats: &RunStats, units: ByteUnits) {
    let lines = summary_lines(stats, units);
    let (main, skipped) = lines.split_at(lines.len().min(5));
    for line in main {
        log::info!("{}", line);
    }
    for line in skipped {
        log::warn!("{}", line);
    }
}
