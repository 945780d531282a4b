//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": {
//!     "9f86d08...": [
//!       { "path": "/a/movie.mkv", "size": 734003200, "size_human": "734.0 MB", "hash": "9f86d08..." },
//!       { "path": "/b/movie.mkv", "size": 734003200, "size_human": "734.0 MB", "hash": "9f86d08..." }
//!     ]
//!   },
//!   "summary": {
//!     "started_at": "2024-05-01T10:00:00Z",
//!     "elapsed_ms": 1234,
//!     "seen_files": 5120,
//!     "filtered_files": 48,
//!     "duplicate_files": 2,
//!     "duplicate_groups": 1,
//!     "wasted_space": 734003200,
//!     "wasted_space_human": "734.0 MB",
//!     "stat_failures": 0,
//!     "hash_failures": 0,
//!     "walk_errors": 0
//!   }
//! }
//! ```
//!
//! Keys of `duplicates` are sorted; the files of a group keep hashing order.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{format_bytes, ByteUnits};
use crate::duplicates::{DuplicateMap, RunStats};
use crate::scanner::FileRecord;

/// One file in a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonFileEntry {
    /// Path as discovered under the scan root
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// File size for humans
    pub size_human: String,
    /// Hex-encoded BLAKE3 hash
    pub hash: String,
}

impl JsonFileEntry {
    fn from_record(record: &FileRecord, units: ByteUnits) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: record.size,
            size_human: format_bytes(record.size, units),
            hash: record.content_hash.clone().unwrap_or_default(),
        }
    }
}

/// Run summary in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// When the run started (RFC 3339)
    pub started_at: DateTime<Utc>,
    /// Run duration in milliseconds
    pub elapsed_ms: u64,
    /// Files the walker tried to stat
    pub seen_files: u64,
    /// Files above the minimum size
    pub filtered_files: u64,
    /// Files in duplicate groups
    pub duplicate_files: u64,
    /// Number of duplicate groups
    pub duplicate_groups: u64,
    /// Bytes held by redundant copies
    pub wasted_space: u64,
    /// Wasted space for humans
    pub wasted_space_human: String,
    /// Files skipped because they could not be stat'ed
    pub stat_failures: u64,
    /// Candidates skipped because they could not be read
    pub hash_failures: u64,
    /// Directories that could not be listed
    pub walk_errors: u64,
}

impl JsonSummary {
    /// Create a JSON summary from run statistics.
    #[must_use]
    pub fn from_stats(stats: &RunStats, units: ByteUnits) -> Self {
        Self {
            started_at: stats.started_at,
            elapsed_ms: u64::try_from(stats.elapsed().as_millis()).unwrap_or(u64::MAX),
            seen_files: stats.seen_files,
            filtered_files: stats.filtered_files,
            duplicate_files: stats.duplicate_files,
            duplicate_groups: stats.duplicate_groups,
            wasted_space: stats.wasted_space,
            wasted_space_human: format_bytes(stats.wasted_space, units),
            stat_failures: stats.stat_failures,
            hash_failures: stats.hash_failures,
            walk_errors: stats.walk_errors,
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate files keyed by hash
    pub duplicates: BTreeMap<String, Vec<JsonFileEntry>>,
    /// Run summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the output from the final groups and stats.
    #[must_use]
    pub fn new(groups: &DuplicateMap, stats: &RunStats, units: ByteUnits) -> Self {
        let duplicates = groups
            .iter()
            .map(|(hash, group)| {
                let files = group
                    .files
                    .iter()
                    .map(|f| JsonFileEntry::from_record(f, units))
                    .collect();
                (hash.clone(), files)
            })
            .collect();

        Self {
            duplicates,
            summary: JsonSummary::from_stats(stats, units),
        }
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing JSON: {0}")]
    Io(#[from] std::io::Error),
}
