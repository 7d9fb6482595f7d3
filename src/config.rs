//! Command line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::client::DEFAULT_BASE_URL;
use crate::net_client::DEFAULT_PAGE_SIZE;
use crate::report::{ReportFiles, DEFAULT_DUMP_FILE, DEFAULT_REPORT_FILE};

/// Forum fetched when none is given: "AnalogGenie - A Generative Engine for
/// Automatic Discovery of Analog Circuit Topologies".
pub const DEFAULT_FORUM: &str = "jCPak79Kev";

/// Fetch an OpenReview forum and write its conversation tree
#[derive(Clone, Debug, Parser)]
#[command(name = "review-thread", version)]
pub struct Config {
    /// Forum id of the paper to fetch
    #[arg(default_value = DEFAULT_FORUM)]
    pub forum: String,

    /// API base URL
    #[arg(long, env = "OPENREVIEW_BASEURL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory the output files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// File name of the raw note dump
    #[arg(long, default_value = DEFAULT_DUMP_FILE)]
    pub dump_file: String,

    /// File name of the rendered conversation tree
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    pub report_file: String,

    /// Notes requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Username for authenticated access
    #[arg(long, env = "OPENREVIEW_USERNAME")]
    pub username: Option<String>,

    /// Password for authenticated access
    #[arg(long, env = "OPENREVIEW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Never prompt for credentials on the terminal
    #[arg(long)]
    pub no_prompt: bool,

    /// Fail if some replies cannot be placed in the tree
    #[arg(long)]
    pub strict: bool,

    /// Log output format
    #[arg(long, env = "TRACING_FMT", value_enum, default_value_t = LogFormat::Full)]
    pub log_format: LogFormat,
}

/// Log output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// [`tracing_subscriber::fmt::format::Full`]
    Full,
    /// [`tracing_subscriber::fmt::format::Compact`]
    Compact,
    /// [`tracing_subscriber::fmt::format::Pretty`]
    Pretty,
    /// [`tracing_subscriber::fmt::format::Json`]
    Json,
}

impl Config {
    /// Paths of the two output files.
    pub fn report_files(&self) -> ReportFiles {
        ReportFiles {
            dump: self.out_dir.join(&self.dump_file),
            report: self.out_dir.join(&self.report_file),
        }
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Username and password, if both were supplied.
    pub fn static_credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        }
    }
}
