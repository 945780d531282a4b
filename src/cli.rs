//! Command-line interface definitions for bigdupe.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates over 30 MiB under ~/Videos
//! bigdupe -d ~/Videos
//!
//! # Lower the threshold and emit JSON for scripting
//! bigdupe -d /srv/media --min-size 100MB --json > dupes.json
//!
//! # Skip an extra directory name on top of the defaults
//! bigdupe -d ~/src -e target -e dist
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find large duplicate files.
///
/// Walks a directory tree, buckets files larger than the minimum size by
/// exact size, and confirms duplicates by hashing their full contents
/// with BLAKE3.
#[derive(Debug, Parser)]
#[command(name = "bigdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (`~` is expanded)
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub dir: PathBuf,

    /// Only consider files strictly larger than this (e.g. 30MiB, 500MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Print the duplicate groups and summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Skip entries whose path ends with this suffix (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "SUFFIX")]
    pub exclude: Vec<String>,

    /// Do not skip .git, .terraform and node_modules
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Number of parallel hashing threads
    #[arg(long, value_name = "N", value_parser = parse_io_threads)]
    pub io_threads: Option<usize>,

    /// Memory-map large files while hashing
    #[arg(long)]
    pub mmap: bool,

    /// Report sizes in binary units (KiB, MiB, ...) instead of SI units
    #[arg(long)]
    pub binary_units: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Whether progress bars should be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !(self.quiet || self.json || self.no_progress)
    }
}

/// Parse a human-readable size such as `30MiB`, `1.5GB` or `1024`.
///
/// Suffixes are case-insensitive. `K`, `M`, `G` and `T` (with or without
/// a trailing `B`) are decimal; `KiB`, `MiB`, `GiB` and `TiB` are binary.
///
/// # Errors
///
/// Returns a message suitable for clap when the number or suffix is invalid
/// or the result does not fit in 64 bits.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    // Whole numbers stay exact; fractions go through f64
    if let Ok(whole) = num_str.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| format!("Size too large: '{s}'"));
    }

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;
    let bytes = num * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(format!("Size too large: '{s}'"));
    }
    Ok(bytes as u64)
}

fn parse_io_threads(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("At least one I/O thread is required".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid thread count: '{s}'")),
    }
}
