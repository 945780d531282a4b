//! Hashing pass and pipeline orchestration.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the whole pipeline for one root directory:
//! 1. **Walk**: collect regular files larger than the minimum size
//! 2. **Size bucketing**: keep only files whose size repeats
//!    (see [`crate::duplicates::groups`])
//! 3. **Hashing**: BLAKE3 over the full contents of every candidate
//! 4. **Grouping**: group by hash and drop singletons
//!
//! Counters for every stage land in one [`RunStats`] value that is passed
//! along by `&mut` and returned in the [`ScanReport`].
//!
//! # Example
//!
//! ```no_run
//! use bigdupe::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
//! let report = finder.find_duplicates(Path::new("/srv/media")).unwrap();
//!
//! println!("{} duplicate groups", report.stats.duplicate_groups);
//! println!("{} bytes wasted", report.stats.wasted_space);
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{group_by_hash, mark_size_duplicates, sort_by_size_desc, DuplicateMap};
use super::RunStats;
use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Files above this size get a debug line when hashing starts.
const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024 * 1024;

/// Configuration for the hashing pass.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the I/O thread count (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
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
}

/// Statistics from the hashing pass.
#[derive(Debug, Default)]
pub struct HashPassStats {
    /// Candidates that entered the pass
    pub input_files: usize,
    /// Candidates that now carry a content hash
    pub hashed_files: usize,
    /// Candidates dropped because they could not be read
    pub failed_files: usize,
    /// Total bytes read by successful hashes
    pub bytes_hashed: u64,
    /// Errors for the dropped candidates
    pub errors: Vec<HashError>,
    /// Whether the pass stopped early on a shutdown request
    pub interrupted: bool,
}

/// Hash every candidate and record the digest on its [`FileRecord`].
///
/// `candidates` holds positions into `records`. Workers only read the
/// records; results are applied afterwards in candidate order, so the
/// outcome does not depend on which worker finishes first.
///
/// A candidate that cannot be opened or read keeps no hash, is logged at
/// warn level and counted in `stats.hash_failures`. It takes no further
/// part in the run.
pub fn hash_candidates(
    records: &mut [FileRecord],
    candidates: &[usize],
    hasher: &Hasher,
    config: &HashConfig,
    stats: &mut RunStats,
) -> HashPassStats {
    let mut pass = HashPassStats {
        input_files: candidates.len(),
        ..Default::default()
    };

    if candidates.is_empty() {
        log::debug!("Hashing: No candidates to process");
        return pass;
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", candidates.len());
    }

    log::info!("Hashing: Computing content hashes for {} files", candidates.len());

    let shared: &[FileRecord] = records;
    let job = || -> Vec<(usize, Result<String, HashError>)> {
        candidates
            .par_iter()
            .enumerate()
            .map(|(n, &idx)| {
                let record = &shared[idx];
                if config.is_shutdown_requested() {
                    return (idx, Err(HashError::Interrupted(record.path.clone())));
                }

                if record.size > LARGE_FILE_THRESHOLD {
                    log::debug!(
                        "Hashing large file ({} MB): {}",
                        record.size / (1024 * 1024),
                        record.path.display()
                    );
                }

                if let Some(ref callback) = config.progress_callback {
                    callback.on_progress(n + 1, record.path.to_string_lossy().as_ref());
                }

                let result = hasher.full_hash_hex(&record.path);
                if let Some(ref callback) = config.progress_callback {
                    match result {
                        Ok(_) => callback.on_item_completed(record.size),
                        Err(HashError::Interrupted(_)) => {}
                        Err(_) => callback.on_item_failed(record.path.to_string_lossy().as_ref()),
                    }
                }
                (idx, result)
            })
            .collect()
    };

    // Bounded pool so that parallel reads don't thrash the disk
    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(job),
        Err(e) => {
            log::warn!(
                "Failed to create hashing thread pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            job()
        }
    };

    for (idx, result) in results {
        let record = &mut records[idx];
        match result {
            Ok(hex) => {
                log::trace!("Hashed {}: {}", record.path.display(), hex);
                pass.hashed_files += 1;
                pass.bytes_hashed += record.size;
                record.set_content_hash(hex);
            }
            Err(HashError::Interrupted(_)) => {
                pass.interrupted = true;
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", record.path.display(), e);
                stats.record_hash_failure();
                pass.failed_files += 1;
                pass.errors.push(e);
            }
        }
    }

    if config.is_shutdown_requested() {
        pass.interrupted = true;
    }
    if pass.interrupted {
        log::info!("Hashing: Interrupted by shutdown signal");
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    log::info!(
        "Hashing complete: {} hashed, {} failed, {} bytes read",
        pass.hashed_files,
        pass.failed_files,
        pass.bytes_hashed
    );

    pass
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration (minimum size and exclusions).
    pub walker_config: WalkerConfig,
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Memory-map large files instead of streaming them.
    pub use_mmap: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("io_threads", &self.io_threads)
            .field("use_mmap", &self.use_mmap)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            io_threads: 4,
            use_mmap: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the I/O thread count (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Enable memory-mapped hashing for large files.
    #[must_use]
    pub fn with_mmap(mut self, enabled: bool) -> Self {
        self.use_mmap = enabled;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
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

    fn hash_config(&self) -> HashConfig {
        HashConfig {
            io_threads: self.io_threads,
            shutdown_flag: self.shutdown_flag.clone(),
            progress_callback: self.progress_callback.clone(),
        }
    }
}

/// Everything a finished run produces.
#[derive(Debug)]
pub struct ScanReport {
    /// Confirmed duplicate groups keyed by hex hash
    pub groups: DuplicateMap,
    /// Counters for the whole run
    pub stats: RunStats,
    /// Per-file errors for candidates dropped during hashing
    pub hash_errors: Vec<HashError>,
}

impl ScanReport {
    /// True when some entries had to be skipped because they could not be read.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.stats.skipped_total() > 0
    }
}

/// Errors that end a run.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The scan root could not be walked.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Duplicate finder that orchestrates the detection pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl std::fmt::Debug for DuplicateFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("config", &self.config)
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new().with_mmap(config.use_mmap);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a finder with default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find duplicate files under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Scan`] when the root is missing, not a
    /// directory or unreadable, and [`FinderError::Interrupted`] when a
    /// shutdown is requested before the run completes. Unreadable entries
    /// below the root are skipped and counted in the report's stats.
    pub fn find_duplicates(&self, root: &Path) -> Result<ScanReport, FinderError> {
        let mut stats = RunStats::start();

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!("Scanning {}", root.display());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let records = walker.walk(&mut stats)?;

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        self.process_records(records, stats)
    }

    /// Run bucketing, hashing and grouping over already-discovered records.
    ///
    /// `records` is the walker's output: every entry already passed the
    /// minimum-size filter. `stats` carries whatever the walk recorded.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if hashing was cut short.
    pub fn process_records(
        &self,
        mut records: Vec<FileRecord>,
        mut stats: RunStats,
    ) -> Result<ScanReport, FinderError> {
        stats.set_filtered(records.len());

        sort_by_size_desc(&mut records);
        let (candidates, _) = mark_size_duplicates(&mut records);

        let pass = hash_candidates(
            &mut records,
            &candidates,
            &self.hasher,
            &self.config.hash_config(),
            &mut stats,
        );
        if pass.interrupted {
            return Err(FinderError::Interrupted);
        }

        let (groups, grouping) = group_by_hash(candidates.iter().map(|&idx| &records[idx]));
        log::debug!(
            "Grouping: {} distinct hashes, {} singletons pruned",
            grouping.distinct_hashes,
            grouping.pruned_singletons
        );

        stats.record_groups(&groups);
        stats.finish();

        log::info!(
            "Scan complete: {} groups, {} duplicate files, {} bytes reclaimable",
            stats.duplicate_groups,
            stats.duplicate_files,
            stats.wasted_space
        );

        Ok(ScanReport {
            groups,
            stats,
            hash_errors: pass.errors,
        })
    }
}
