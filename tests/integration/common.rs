use bigdupe::duplicates::{DuplicateFinder, FinderConfig};
use bigdupe::scanner::WalkerConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A finder with the given threshold and the default exclusions.
pub fn finder(min_size: u64) -> DuplicateFinder {
    let walker = WalkerConfig {
        min_size,
        ..Default::default()
    };
    DuplicateFinder::new(FinderConfig::default().with_walker_config(walker))
}
