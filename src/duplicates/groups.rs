//! Size bucketing and hash grouping.
//!
//! # Overview
//!
//! This module holds the two cheap, I/O-free stages of duplicate detection:
//!
//! - **Size bucketing**: files with a size no other candidate shares cannot
//!   be duplicates. [`mark_size_duplicates`] flags every record whose size
//!   repeats and returns their positions; everything else is left alone.
//! - **Hash grouping**: once the candidates have content hashes,
//!   [`group_by_hash`] collects them per hash and prunes singleton groups
//!   (same size, different content).
//!
//! # Example
//!
//! ```
//! use bigdupe::duplicates::{mark_size_duplicates, sort_by_size_desc};
//! use bigdupe::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let mut records = vec![
//!     FileRecord::new(PathBuf::from("/a.bin"), 1024),
//!     FileRecord::new(PathBuf::from("/b.bin"), 2048),
//!     FileRecord::new(PathBuf::from("/c.bin"), 1024),
//! ];
//! sort_by_size_desc(&mut records);
//!
//! let (candidates, stats) = mark_size_duplicates(&mut records);
//! assert_eq!(candidates.len(), 2);
//! assert_eq!(stats.eliminated_unique, 1);
//! assert!(!records[0].is_duplicate_candidate); // the 2048-byte file
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::FileRecord;

/// Confirmed duplicate groups keyed by hex content hash, sorted by hash.
pub type DuplicateMap = BTreeMap<String, DuplicateGroup>;

/// A confirmed set of files with identical size and content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Hex-encoded content hash shared by every member
    pub hash: String,
    /// File size in bytes shared by every member
    pub size: u64,
    /// Members in the order they were hashed
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: String, size: u64, files: Vec<FileRecord>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }

    /// Bytes held by the extra copies: one member is kept, the rest are waste.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of redundant copies (total - 1 kept).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Sort records by descending size, breaking ties by path.
///
/// Bucketing does not depend on order; this keeps reports stable.
pub fn sort_by_size_desc(records: &mut [FileRecord]) {
    records.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
}

/// Statistics from the size bucketing stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Number of records examined
    pub total_files: usize,
    /// Number of distinct sizes among them
    pub unique_sizes: usize,
    /// Records sharing their size with at least one other record
    pub potential_duplicates: usize,
    /// Records with a size nobody else has
    pub eliminated_unique: usize,
    /// Sizes held by two or more records
    pub size_groups: usize,
}

impl BucketStats {
    /// Percentage of records eliminated by size alone.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Flag every record whose size is shared with another record.
///
/// Records are mutated in place. The returned positions index into
/// `records` and are in list order, so a size-sorted list yields a
/// size-sorted working list.
///
/// Runs in linear time with a size -> count map; the result is the same
/// as comparing every pair of records.
pub fn mark_size_duplicates(records: &mut [FileRecord]) -> (Vec<usize>, BucketStats) {
    let mut counts: HashMap<u64, usize> = HashMap::with_capacity(records.len());
    for record in records.iter() {
        *counts.entry(record.size).or_default() += 1;
    }

    let mut stats = BucketStats {
        total_files: records.len(),
        unique_sizes: counts.len(),
        size_groups: counts.values().filter(|&&n| n > 1).count(),
        ..Default::default()
    };

    let mut working = Vec::new();
    for (idx, record) in records.iter_mut().enumerate() {
        if counts.get(&record.size).copied().unwrap_or(0) > 1 {
            record.mark_duplicate_candidate();
            working.push(idx);
        } else {
            log::trace!(
                "Eliminated unique size {}: {}",
                record.size,
                record.path.display()
            );
        }
    }

    stats.potential_duplicates = working.len();
    stats.eliminated_unique = stats.total_files - stats.potential_duplicates;

    log::info!(
        "Size bucketing: {} files → {} potential duplicates in {} size groups ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.size_groups,
        stats.elimination_rate()
    );

    (working, stats)
}

/// Statistics from the hash grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Records that carried a content hash
    pub hashed_files: usize,
    /// Distinct hashes among them
    pub distinct_hashes: usize,
    /// Hash groups dropped for having a single member
    pub pruned_singletons: usize,
}

/// Group hashed records by content hash and prune singletons.
///
/// Records without a hash (never hashed, or dropped after a read failure)
/// are ignored. Group members keep the order in which they are supplied.
pub fn group_by_hash<'a>(
    records: impl IntoIterator<Item = &'a FileRecord>,
) -> (DuplicateMap, GroupingStats) {
    let mut by_hash: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for record in records {
        if let Some(ref hash) = record.content_hash {
            stats.hashed_files += 1;
            by_hash.entry(hash.clone()).or_default().push(record.clone());
        }
    }

    stats.distinct_hashes = by_hash.len();

    let mut groups = DuplicateMap::new();
    for (hash, files) in by_hash {
        if files.len() < 2 {
            stats.pruned_singletons += 1;
            log::debug!(
                "Pruned {}: size matched another file but content differs",
                files[0].path.display()
            );
            continue;
        }

        let size = files[0].size;
        log::debug!(
            "Duplicate group {}: {} files, {} bytes each",
            hash,
            files.len(),
            size
        );
        groups.insert(hash.clone(), DuplicateGroup::new(hash, size, files));
    }

    (groups, stats)
}
