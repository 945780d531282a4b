//! Reporting of scan results.
//!
//! - [`json`]: the hash -> files mapping plus a summary, for scripting
//! - [`summary`]: the human-readable run summary written to the log
//!
//! # Example
//!
//! ```no_run
//! use bigdupe::duplicates::DuplicateFinder;
//! use bigdupe::output::{json::JsonOutput, summary::log_summary, ByteUnits};
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! log_summary(&report.stats, ByteUnits::Si);
//! let output = JsonOutput::new(&report.groups, &report.stats, ByteUnits::Si);
//! output.write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod summary;

use bytesize::ByteSize;

pub use json::{JsonOutput, JsonOutputError};
pub use summary::{log_summary, summary_lines};

/// Unit system used for human-readable byte counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteUnits {
    /// Powers of 1000 (kB, MB, GB)
    #[default]
    Si,
    /// Powers of 1024 (KiB, MiB, GiB)
    Binary,
}

impl ByteUnits {
    /// Pick the unit system from the `binary_units` setting.
    #[must_use]
    pub fn from_binary_flag(binary: bool) -> Self {
        if binary {
            Self::Binary
        } else {
            Self::Si
        }
    }
}

/// Format a byte count for display.
///
/// ```
/// use bigdupe::output::{format_bytes, ByteUnits};
///
/// assert_eq!(format_bytes(1_500_000, ByteUnits::Si), "1.5 MB");
/// assert_eq!(format_bytes(1_572_864, ByteUnits::Binary), "1.5 MiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64, units: ByteUnits) -> String {
    let size = ByteSize::b(bytes);
    match units {
        ByteUnits::Si => size.display().si().to_string(),
        ByteUnits::Binary => size.display().iec().to_string(),
    }
}
