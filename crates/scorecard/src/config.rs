//! Locations and defaults shared by the subcommands.
//!
//! # Environment Variables
//!
//! - `SCORECARD_DATA_DIR`: Override the data directory (default `~/.scorecard`)
//! - `SCORECARD_PLANNING_YEAR`: Year used for new schedules

use std::path::PathBuf;

/// Environment variable for a custom data directory.
pub const DATA_DIR_ENV: &str = "SCORECARD_DATA_DIR";

/// Environment variable for the planning year.
pub const PLANNING_YEAR_ENV: &str = "SCORECARD_PLANNING_YEAR";

/// Default data directory name under home.
const DEFAULT_DATA_DIR: &str = ".scorecard";

/// Get the data directory.
///
/// Resolved from `SCORECARD_DATA_DIR`, then `~/.scorecard`, then
/// `.scorecard` in the current directory.
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_dir())
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Inserts `-N` before the extension of `path`.
pub fn numbered_path(path: &std::path::Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}-{}", stem, n),
    };
    path.with_file_name(name)
}
