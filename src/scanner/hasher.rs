//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 hashes
//! of file contents. Files are streamed through a fixed-size buffer so
//! memory use stays flat regardless of file size. Memory-mapped hashing
//! can be enabled for very large files.
//!
//! # Example
//!
//! ```no_run
//! use bigdupe::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.full_hash(Path::new("movie.mkv")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::HashError;

/// A raw BLAKE3 digest.
pub type Hash = [u8; 32];

/// Length of a hex-encoded [`Hash`].
pub const HASH_HEX_LEN: usize = 64;

/// Read buffer size for streaming hashes (64 KiB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Default size at which memory mapping kicks in, when enabled.
const DEFAULT_MMAP_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Encode a hash as lowercase hexadecimal.
///
/// # Example
///
/// ```
/// use bigdupe::scanner::hash_to_hex;
///
/// let hex = hash_to_hex(&[0xab; 32]);
/// assert_eq!(hex.len(), 64);
/// assert!(hex.starts_with("abab"));
/// ```
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}

/// Content hasher for duplicate confirmation.
#[derive(Debug, Clone)]
pub struct Hasher {
    use_mmap: bool,
    mmap_threshold: u64,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a streaming hasher with memory mapping disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            use_mmap: false,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            shutdown_flag: None,
        }
    }

    /// Enable or disable memory-mapped hashing.
    #[must_use]
    pub fn with_mmap(mut self, enabled: bool) -> Self {
        self.use_mmap = enabled;
        self
    }

    /// Set the file size at or above which memory mapping is used.
    #[must_use]
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    /// Set the shutdown flag checked before hashing and between reads.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read, or if
    /// shutdown is requested mid-file.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        if self.is_shutdown_requested() {
            return Err(HashError::Interrupted(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;

        if self.use_mmap {
            let len = file
                .metadata()
                .map_err(|e| HashError::from_io(path.to_path_buf(), e))?
                .len();
            if len > 0 && len >= self.mmap_threshold {
                match Self::mmap_hash(path) {
                    Ok(hash) => return Ok(hash),
                    Err(e) => {
                        log::debug!(
                            "Memory map failed for {}, streaming instead: {}",
                            path.display(),
                            e
                        );
                    }
                }
            }
        }

        self.stream_hash(file, path)
    }

    /// Hash a file and return its hex-encoded digest.
    ///
    /// # Errors
    ///
    /// See [`Hasher::full_hash`].
    pub fn full_hash_hex(&self, path: &Path) -> Result<String, HashError> {
        self.full_hash(path).map(|hash| hash_to_hex(&hash))
    }

    fn stream_hash(&self, mut file: File, path: &Path) -> Result<Hash, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }

    fn mmap_hash(path: &Path) -> std::io::Result<Hash> {
        let mut hasher = blake3::Hasher::new();
        hasher.update_mmap(path)?;
        Ok(*hasher.finalize().as_bytes())
    }
}
