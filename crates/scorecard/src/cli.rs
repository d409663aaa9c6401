//! Command-line interface definition using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use scorecard_planner::{ExportFormat, DEFAULT_API_URL, DEFAULT_PLANNING_YEAR};

use crate::config::{self, DATA_DIR_ENV, PLANNING_YEAR_ENV};

/// Scorecard - balanced-scorecard initiative planner
#[derive(Parser, Debug)]
#[command(name = "scorecard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to data directory
    #[arg(short, long, env = DATA_DIR_ENV, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Year applied to new schedules
    #[arg(long, env = PLANNING_YEAR_ENV, default_value_t = DEFAULT_PLANNING_YEAR, global = true)]
    pub planning_year: i32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the REST API server
    Serve {
        /// Address to bind
        #[arg(long, env = "SCORECARD_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "SCORECARD_PORT", default_value_t = scorecard_api::config::DEFAULT_PORT)]
        port: u16,

        /// Allowed CORS origin (repeatable; any origin when omitted)
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,

        /// Do not seed an empty store
        #[arg(long)]
        no_seed: bool,
    },

    /// Add the default perspectives and initiatives
    Seed,

    /// Export the plan from a running server
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output file (default: dated file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// API base URL
        #[arg(long, env = "SCORECARD_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Shift or resize an initiative's bar by whole months
    Reschedule {
        /// Initiative code, e.g. F1
        #[arg(required = true)]
        code: String,

        /// Months to move (negative moves earlier)
        #[arg(long, allow_hyphen_values = true)]
        by: i64,

        /// Drag a single edge instead of the whole bar
        #[arg(long, value_enum)]
        edge: Option<EdgeArg>,

        /// API base URL
        #[arg(long, env = "SCORECARD_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    /// Paginated vector pages
    #[value(alias = "pdf")]
    Svg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Svg => ExportFormat::Svg,
        }
    }
}

/// Bar edge argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeArg {
    Start,
    End,
}

impl Cli {
    /// Returns the data directory path, using default if not specified.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(config::data_dir)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
