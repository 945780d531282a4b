//! Run-wide counters for a single scan.
//!
//! A [`RunStats`] value is created when a run starts and passed by `&mut`
//! to each pipeline stage in turn. Nothing else owns it and nothing writes
//! to it concurrently.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use super::DuplicateMap;

/// Counters accumulated across one scan.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Wall-clock time the run started
    pub started_at: DateTime<Utc>,
    /// Monotonic start instant used for `elapsed`
    started: Instant,
    /// Time from start to the end of grouping, set once by [`RunStats::finish`]
    pub elapsed: Option<Duration>,
    /// Files the walker attempted to stat
    pub seen_files: u64,
    /// Files that passed the minimum-size filter
    pub filtered_files: u64,
    /// Files in confirmed duplicate groups (every member, kept copy included)
    pub duplicate_files: u64,
    /// Bytes held by redundant copies
    pub wasted_space: u64,
    /// Confirmed duplicate groups
    pub duplicate_groups: u64,
    /// Files skipped because their metadata could not be read
    pub stat_failures: u64,
    /// Candidates dropped because they could not be opened or read
    pub hash_failures: u64,
    /// Directories below the root that could not be listed
    pub walk_errors: u64,
}

impl RunStats {
    /// Start a new run, stamping the current time.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            elapsed: None,
            seen_files: 0,
            filtered_files: 0,
            duplicate_files: 0,
            wasted_space: 0,
            duplicate_groups: 0,
            stat_failures: 0,
            hash_failures: 0,
            walk_errors: 0,
        }
    }

    /// Count one entry the walker attempted to stat.
    pub fn record_seen(&mut self) {
        self.seen_files += 1;
    }

    /// Count one entry skipped because its metadata could not be read.
    pub fn record_stat_failure(&mut self) {
        self.stat_failures += 1;
    }

    /// Count one directory entry the walker could not read.
    pub fn record_walk_error(&mut self) {
        self.walk_errors += 1;
    }

    /// Count one candidate dropped because it could not be hashed.
    pub fn record_hash_failure(&mut self) {
        self.hash_failures += 1;
    }

    /// Record the length of the candidate list after the size filter.
    pub fn set_filtered(&mut self, count: usize) {
        self.filtered_files = count as u64;
    }

    /// Derive duplicate and waste totals from the final groups.
    pub fn record_groups(&mut self, groups: &DuplicateMap) {
        self.duplicate_groups = groups.len() as u64;
        self.duplicate_files = groups.values().map(|g| g.len() as u64).sum();
        self.wasted_space = groups.values().map(super::DuplicateGroup::wasted_space).sum();
    }

    /// Stop the clock. Only the first call has an effect.
    pub fn finish(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = Some(self.started.elapsed());
        }
    }

    /// Elapsed time, or the time so far if the run has not finished.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }

    /// Total entries that were skipped because they could not be read.
    #[must_use]
    pub fn skipped_total(&self) -> u64 {
        self.stat_failures + self.hash_failures + self.walk_errors
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::start()
    }
}
