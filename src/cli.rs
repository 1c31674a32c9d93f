//! CLI arguments and subcommands for procpair.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::process::{SortField, SortOrder};

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for process listings and pair results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procpair",
    about = "Find the pair of processes with the most similar memory/CPU profile",
    long_about = "Find the pair of processes with the most similar memory/CPU profile.\n\n\
                  Scans /proc, filters processes by memory, CPU ticks, command and owner, \
                  and reports the two processes whose combined memory (KB) and CPU tick \
                  difference is smallest. Can monitor continuously and alert when the pair changes.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (overrides `log_level` from the config file; default warn)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Minimum resident memory in KB
    #[arg(long, global = true)]
    pub min_memory_kb: Option<u64>,

    /// Maximum resident memory in KB
    #[arg(long, global = true)]
    pub max_memory_kb: Option<u64>,

    /// Minimum cumulative CPU ticks (user + system)
    #[arg(long, global = true)]
    pub min_cpu_ticks: Option<u64>,

    /// Only processes whose command contains this text (case-sensitive)
    #[arg(long = "name", global = true)]
    pub command_filter: Option<String>,

    /// Only processes owned by this uid or user name (case-insensitive)
    #[arg(short = 'u', long, global = true)]
    pub owner: Option<String>,

    /// Sort key applied before pairing and rendering
    #[arg(long, value_enum, global = true)]
    pub sort_by: Option<SortField>,

    /// Sort order
    #[arg(long, value_enum, global = true)]
    pub order: Option<SortOrder>,

    /// Parallel parsing threads (0 = auto)
    #[arg(long, global = true)]
    pub parallelism: Option<usize>,

    /// procfs mount point
    #[arg(long, global = true)]
    pub proc_root: Option<PathBuf>,

    /// Path to JSON snapshot file (uses recorded data instead of /proc)
    #[arg(short = 't', long, global = true)]
    pub test_data_file: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all matching processes
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Show at most N processes
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show the best matching pair
    Best {
        /// Use these two match-set indices instead of searching (e.g. 0,3)
        #[arg(long, value_delimiter = ',')]
        pair: Option<Vec<usize>>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Repeat the best-pair search on an interval and alert on change
    Monitor {
        /// Seconds between cycles
        #[arg(short = 'i', long)]
        interval: Option<u64>,

        /// Use these two match-set indices instead of searching (e.g. 0,3)
        #[arg(long, value_delimiter = ',')]
        pair: Option<Vec<usize>>,

        /// Do not emit alerts when the pair changes
        #[arg(long)]
        no_alerts: bool,

        /// Do not send desktop notifications
        #[arg(long)]
        no_desktop: bool,

        /// Stop after N cycles
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Validate configuration and system requirements
    Check,

    /// Generate a synthetic snapshot JSON file
    GenerateTestdata {
        /// Output file path
        #[arg(short = 'o', long, default_value = "testdata.json")]
        output: PathBuf,

        /// Number of processes to generate
        #[arg(long, default_value_t = 40)]
        count: usize,
    },
}
