//! Layered application settings.
//!
//! Settings are resolved with `figment` in three layers, later ones
//! winning:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. a TOML file: `--config PATH` if given, otherwise `config.toml` in the
//!    platform config directory when it exists
//! 3. command-line flags ([`Settings::apply_cli`])
//!
//! ```toml
//! # ~/.config/bigdupe/config.toml
//! min_size = 104857600
//! exclude = [".git", "node_modules", "target"]
//! io_threads = 8
//! binary_units = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::scanner::{WalkerConfig, DEFAULT_EXCLUDES, DEFAULT_MIN_SIZE};

/// Default number of hashing threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Files must be strictly larger than this many bytes
    pub min_size: u64,
    /// Path suffixes to skip
    pub exclude: Vec<String>,
    /// Parallel hashing threads
    pub io_threads: usize,
    /// Memory-map large files while hashing
    pub mmap: bool,
    /// Report sizes in KiB/MiB instead of kB/MB
    pub binary_units: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            exclude: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect(),
            io_threads: DEFAULT_IO_THREADS,
            mmap: false,
            binary_units: false,
        }
    }
}

/// Errors raised while loading settings.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The config file could not be parsed or holds invalid values.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// `io_threads` was set to zero.
    #[error("io_threads must be at least 1")]
    ZeroIoThreads,
}

impl Settings {
    /// Load defaults merged with the config file.
    ///
    /// With `path` set, that file must exist. Without it, the default
    /// location is used if a file is there and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing (explicit path only),
    /// malformed, or sets `io_threads = 0`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.is_file()),
        };

        match file {
            Some(ref p) => log::debug!("Loading settings from {}", p.display()),
            None => log::debug!("No config file, using built-in defaults"),
        }

        let settings: Self = Self::figment(file.as_deref())
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Build the figment for defaults plus an optional TOML file.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        match file {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::ZeroIoThreads);
        }
        Ok(())
    }

    /// Overlay command-line flags.
    ///
    /// `--exclude` values are appended to the configured list;
    /// `--no-default-excludes` removes the built-in entries first.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }
        if cli.no_default_excludes {
            self.exclude
                .retain(|suffix| !DEFAULT_EXCLUDES.contains(&suffix.as_str()));
        }
        for suffix in &cli.exclude {
            if !self.exclude.contains(suffix) {
                self.exclude.push(suffix.clone());
            }
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads;
        }
        self.mmap |= cli.mmap;
        self.binary_units |= cli.binary_units;
    }

    /// Walker settings derived from these settings.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.min_size, self.exclude.clone())
    }
}

/// Location of the per-user config file, if the platform has one.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bigdupe").map(|dirs| dirs.config_dir().join("config.toml"))
}
