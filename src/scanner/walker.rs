//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting the files large enough to be worth checking for
//! duplicates.
//!
//! # Features
//!
//! - Directory reads run on jwalk's bounded rayon pool
//! - Excluded suffixes are pruned inside `process_read_dir`, so excluded
//!   subtrees are never opened
//! - Strict minimum-size filter (`size > min_size`)
//! - Unreadable entries are skipped and counted, never fatal
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use bigdupe::duplicates::RunStats;
//! use bigdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let mut stats = RunStats::start();
//! let walker = Walker::new(Path::new("/home/user/Videos"), WalkerConfig::default());
//! let candidates = walker.walk(&mut stats).unwrap();
//! println!("{} of {} files are candidates", candidates.len(), stats.seen_files);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::path_utils::is_excluded;
use super::{FileRecord, ScanError, WalkerConfig};
use crate::duplicates::RunStats;
use crate::progress::ProgressCallback;

/// Directory walker for candidate discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress reporting
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops iterating as soon
    /// as possible and returns what it has collected so far.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback, notified once per file seen.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Make sure the root exists, is a directory and can be listed.
    fn check_root(&self) -> Result<(), ScanError> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|e| ScanError::from_io(self.root.clone(), e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        std::fs::read_dir(&self.root).map_err(|e| ScanError::from_io(self.root.clone(), e))?;
        Ok(())
    }

    /// Walk the directory tree and return the candidate files.
    ///
    /// Every non-directory entry that is not excluded counts as seen in
    /// `stats`, whether or not its stat succeeds. Only regular files
    /// strictly larger than the configured minimum size are returned.
    /// The order of the returned records is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] only when the root itself cannot be walked.
    /// Failures below the root are logged and counted in `stats`.
    pub fn walk(&self, stats: &mut RunStats) -> Result<Vec<FileRecord>, ScanError> {
        self.check_root()?;

        if is_excluded(&self.root, &self.config.exclude) {
            log::info!("Scan root {} is excluded, nothing to walk", self.root.display());
            return Ok(Vec::new());
        }

        let excludes = self.config.exclude.clone();
        let walk_dir = WalkDir::new(&self.root)
            .sort(false)
            .skip_hidden(false)
            .follow_links(false)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Dropping an entry here also keeps jwalk from descending into it
                children.retain(|child| match child {
                    Ok(entry) => {
                        let path = entry.path();
                        if is_excluded(&path, &excludes) {
                            log::trace!("Excluding {}", path.display());
                            false
                        } else {
                            true
                        }
                    }
                    Err(_) => true,
                });
            });

        let mut candidates = Vec::new();

        for entry_result in walk_dir {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                break;
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Cannot read {}: {}", path.display(), e);
                    stats.record_walk_error();
                    continue;
                }
            };

            let path = entry.path();

            // Skip the root directory itself and all directories
            if path == self.root || entry.file_type().is_dir() {
                continue;
            }

            stats.record_seen();
            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(stats.seen_files as usize, path.to_string_lossy().as_ref());
            }

            if let Some(record) = self.process_file(path, stats) {
                candidates.push(record);
            }
        }

        log::info!(
            "Walk complete: {} files seen, {} larger than {} bytes",
            stats.seen_files,
            candidates.len(),
            self.config.min_size
        );

        Ok(candidates)
    }

    /// Stat a file (following symlinks) and apply the size filter.
    fn process_file(&self, path: PathBuf, stats: &mut RunStats) -> Option<FileRecord> {
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                log::debug!("Skipping {}: {}", path.display(), e);
                stats.record_stat_failure();
                return None;
            }
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        let size = metadata.len();
        if size <= self.config.min_size {
            log::trace!("Skipping file due to size filter ({}): {}", size, path.display());
            return None;
        }

        Some(FileRecord::new(path, size))
    }
}
