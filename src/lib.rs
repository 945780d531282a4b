//! bigdupe - large duplicate file finder
//!
//! Walks a directory tree, keeps files above a size threshold, buckets
//! them by exact size and confirms duplicates by hashing their full
//! contents with BLAKE3. Results are reported as a summary log and,
//! optionally, as JSON.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Settings;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{log_summary, ByteUnits, JsonOutput};
use crate::progress::Progress;
use crate::scanner::path_utils::{absolute_root, expand_tilde};

/// Run one scan as described by the parsed command line.
///
/// The root is made absolute first, so reported paths are absolute.
/// Logging must already be initialized. Returns [`ExitCode::PartialSuccess`]
/// when some entries had to be skipped, [`ExitCode::Success`] otherwise.
///
/// # Errors
///
/// Fails on invalid configuration, an unusable scan root, an interrupt or
/// a failure to write the JSON output.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    settings.apply_cli(&cli);
    log::debug!("Effective settings: {:?}", settings);

    let root = absolute_root(&expand_tilde(&cli.dir));
    let handler = signal::install_handler().context("Failed to set up Ctrl+C handling")?;
    let progress = Arc::new(Progress::new(!cli.show_progress()));

    let config = FinderConfig::default()
        .with_walker_config(settings.walker_config())
        .with_io_threads(settings.io_threads)
        .with_mmap(settings.mmap)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);

    let report = DuplicateFinder::new(config)
        .find_duplicates(&root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let units = ByteUnits::from_binary_flag(settings.binary_units);
    log_summary(&report.stats, units);

    if cli.json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        JsonOutput::new(&report.groups, &report.stats, units)
            .write_to(&mut out)
            .context("Failed to write JSON output")?;
        out.flush().context("Failed to flush JSON output")?;
    }

    if report.is_partial() {
        log::warn!(
            "{} entries could not be read and were skipped",
            report.stats.skipped_total()
        );
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}
