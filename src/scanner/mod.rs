//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking using jwalk, with suffix-based subtree exclusion
//! - Content hashing with BLAKE3
//! - Home directory (`~`) expansion and exclusion matching
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming or memory-mapped)
//! - [`path_utils`]: Path helpers shared by the walker and the CLI
//!
//! # Example
//!
//! ```no_run
//! use bigdupe::duplicates::RunStats;
//! use bigdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: 1024 * 1024,
//!     ..Default::default()
//! };
//!
//! let mut stats = RunStats::start();
//! let walker = Walker::new(Path::new("."), config);
//! let candidates = walker.walk(&mut stats).unwrap();
//! for record in &candidates {
//!     println!("{}: {} bytes", record.path.display(), record.size);
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

use serde::Serialize;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher, HASH_HEX_LEN};
pub use walker::Walker;

/// Default minimum file size: 30 MiB.
///
/// Only files strictly larger than this are considered.
pub const DEFAULT_MIN_SIZE: u64 = 30 * 1024 * 1024;

/// Path suffixes excluded from every scan unless disabled.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", ".terraform", "node_modules"];

/// One on-disk file considered by the duplicate pipeline.
///
/// Created by the [`Walker`], then mutated in place: the size bucketer sets
/// the candidate flag and the hashing pass fills in the content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path of the file as discovered under the scan root
    pub path: PathBuf,
    /// File size in bytes, read once at discovery time
    pub size: u64,
    /// Set when another record shares this exact size
    #[serde(skip)]
    pub is_duplicate_candidate: bool,
    /// Hex-encoded content checksum, once computed
    pub content_hash: Option<String>,
}

impl FileRecord {
    /// Create a new record with no candidate flag and no hash.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_duplicate_candidate: false,
            content_hash: None,
        }
    }

    /// Mark this record as a size-duplicate candidate.
    ///
    /// The flag is never cleared once set.
    pub fn mark_duplicate_candidate(&mut self) {
        self.is_duplicate_candidate = true;
    }

    /// Record the content hash.
    ///
    /// The first hash recorded wins; later calls are ignored.
    pub fn set_content_hash(&mut self, hash: String) {
        if self.content_hash.is_none() {
            self.content_hash = Some(hash);
        } else {
            log::debug!("Content hash already set for {}", self.path.display());
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Files must be strictly larger than this to become candidates.
    pub min_size: u64,

    /// Path suffixes whose entries (and whole subtrees) are skipped.
    ///
    /// A suffix matches when the entry path ends with it component-wise,
    /// so `node_modules` matches `/a/node_modules` but not `/a/my_node_modules`.
    pub exclude: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            exclude: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `min_size` - Exclusive minimum file size
    /// * `exclude` - Path suffixes to skip
    #[must_use]
    pub fn new(min_size: u64, exclude: Vec<String>) -> Self {
        Self { min_size, exclude }
    }
}

/// Fatal errors that prevent a scan from starting.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when reading the scan root.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while opening the scan root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised while opening the scan root.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

/// Errors that can occur while hashing a single file.
///
/// These never abort a scan; the affected file is dropped.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared between discovery and hashing.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}
