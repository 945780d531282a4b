//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size bucketing of walker output
//! - Parallel content hashing of size-duplicate candidates
//! - Hash grouping with singleton pruning
//! - Run-wide statistics

pub mod finder;
pub mod groups;
pub mod stats;

pub use finder::{
    hash_candidates, DuplicateFinder, FinderConfig, FinderError, HashConfig, HashPassStats,
    ScanReport,
};
pub use groups::{
    group_by_hash, mark_size_duplicates, sort_by_size_desc, BucketStats, DuplicateGroup,
    DuplicateMap, GroupingStats,
};
pub use stats::RunStats;
