//! Path helpers for scan roots and exclusion matching.
//!
//! # Example
//!
//! ```
//! use bigdupe::scanner::path_utils::is_excluded;
//! use std::path::Path;
//!
//! let excludes = vec!["node_modules".to_string()];
//! assert!(is_excluded(Path::new("/src/app/node_modules"), &excludes));
//! assert!(!is_excluded(Path::new("/src/app/my_node_modules"), &excludes));
//! ```

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Expand a leading `~` to the current user's home directory.
///
/// Only `~` on its own and `~/...` are expanded. `~user/...` and paths
/// without a leading tilde are returned unchanged, as is everything when
/// the home directory cannot be determined.
///
/// # Example
///
/// ```
/// use bigdupe::scanner::path_utils::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(expand_tilde(Path::new("/tmp/data")), PathBuf::from("/tmp/data"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(home) = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()) else {
        return path.to_path_buf();
    };
    expand_tilde_with(path, &home)
}

/// Expand a leading `~` against an explicit home directory.
#[must_use]
pub fn expand_tilde_with(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Make a scan root absolute against the current directory.
///
/// Symlinks are not resolved and the path need not exist. If the current
/// directory is unavailable the path is returned unchanged and the walker
/// reports the problem.
#[must_use]
pub fn absolute_root(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|e| {
        log::debug!("Cannot make {} absolute: {}", path.display(), e);
        path.to_path_buf()
    })
}

/// Check whether `path` ends with any of the excluded suffixes.
///
/// Matching is component-wise, equivalent to the path string ending in
/// `/` followed by the suffix. Empty suffixes never match.
#[must_use]
pub fn is_excluded(path: &Path, excludes: &[String]) -> bool {
    excludes
        .iter()
        .filter(|suffix| !suffix.is_empty())
        .any(|suffix| path.ends_with(suffix))
}
