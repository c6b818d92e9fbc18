use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use sealog_core::VERSION;

/// sealog - throttle, optionally encrypt, and durably store lines from stdin
#[derive(Parser)]
#[command(name = "sealog")]
#[command(author, version = VERSION, about, long_about = None)]
pub struct Cli {
    /// Passphrase enabling per-line encryption (at least 4 bytes, any encoding)
    #[arg(long, env = "SEALOG_LOG_KEY", hide_env_values = true)]
    pub log_key: Option<OsString>,

    /// Path to the file where lines are stored
    #[arg(long, env = "SEALOG_FILE_PATH", value_name = "PATH")]
    pub file_path: Option<PathBuf>,

    /// Write buffer size in bytes (max 1 MiB)
    #[arg(long, value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// Lines admitted per second (max 3000)
    #[arg(long, value_name = "N")]
    pub flow_speed: Option<u32>,

    /// Replay the file instead of writing it: print each record and its decoded line
    #[arg(long)]
    pub debug: bool,

    /// Replay output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file path
    #[arg(long, env = "SEALOG_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. "info", "sealog_core=debug")
    #[arg(long, env = "SEALOG_LOG", value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Output format for replay mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Encoded record, decoded line, separator
    Text,
    /// One JSON object per record
    Json,
}
