//! Configuration management for procpair.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};

use crate::cli::{Args, Commands, ConfigFormat};
use crate::error::ConfigError;
use crate::monitor::MonitorSettings;
use crate::process::{FilterCriteria, SortField, SortOrder};

// Default configuration constants
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_INTERVAL_SECONDS: u64 = 5;

/// Effective configuration. Every field is optional so that partial files
/// merge cleanly with defaults and CLI overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Filters
    #[serde(alias = "min-memory-kb")]
    pub min_memory_kb: Option<u64>,
    #[serde(alias = "max-memory-kb")]
    pub max_memory_kb: Option<u64>,
    #[serde(alias = "min-cpu-ticks")]
    pub min_cpu_ticks: Option<u64>,
    pub command: Option<String>,
    pub owner: Option<String>,

    // Ordering
    #[serde(alias = "sort-by")]
    pub sort_by: Option<SortField>,
    #[serde(alias = "sort-order")]
    pub sort_order: Option<SortOrder>,

    /// Manual override pair as two match-set indices
    pub pair: Option<Vec<usize>>,

    // Monitor
    #[serde(alias = "interval-seconds")]
    pub interval_seconds: Option<u64>,
    #[serde(alias = "alerts-enabled")]
    pub alerts_enabled: Option<bool>,
    #[serde(alias = "desktop-notifications")]
    pub desktop_notifications: Option<bool>,
    #[serde(alias = "max-cycles")]
    pub max_cycles: Option<u64>,

    // Collection
    pub parallelism: Option<usize>,
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    /// Path to JSON snapshot file (uses recorded data instead of /proc)
    #[serde(alias = "test-data-file")]
    pub test_data_file: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_memory_kb: Some(0),
            max_memory_kb: None,
            min_cpu_ticks: Some(0),
            command: None,
            owner: None,
            sort_by: Some(SortField::Pid),
            sort_order: Some(SortOrder::Asc),
            pair: None,
            interval_seconds: Some(DEFAULT_INTERVAL_SECONDS),
            alerts_enabled: Some(true),
            desktop_notifications: Some(true),
            max_cycles: None,
            parallelism: None,
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            test_data_file: None,
            log_level: Some("warn".into()),
        }
    }
}

impl Config {
    pub fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_memory_kb: self.min_memory_kb.unwrap_or(0),
            max_memory_kb: self.max_memory_kb,
            min_cpu_ticks: self.min_cpu_ticks.unwrap_or(0),
            command: self.command.clone().filter(|c| !c.is_empty()),
            owner: self.owner.clone(),
        }
    }

    pub fn sort(&self) -> (SortField, SortOrder) {
        (
            self.sort_by.unwrap_or_default(),
            self.sort_order.unwrap_or_default(),
        )
    }

    /// Manual override pair, if configured. Assumes a validated config.
    pub fn manual_pair(&self) -> Option<(usize, usize)> {
        match self.pair.as_deref() {
            Some([first, second]) => Some((*first, *second)),
            _ => None,
        }
    }

    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    /// Effective tracing level. `None` disables logging. Unknown values fall
    /// back to warn; validation rejects them before this is consulted.
    pub fn tracing_level(&self) -> Option<Level> {
        match self
            .log_level
            .as_deref()
            .unwrap_or("warn")
            .to_ascii_lowercase()
            .as_str()
        {
            "off" => None,
            "error" => Some(Level::ERROR),
            "info" => Some(Level::INFO),
            "debug" => Some(Level::DEBUG),
            "trace" => Some(Level::TRACE),
            _ => Some(Level::WARN),
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            interval: Duration::from_secs(
                self.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS),
            ),
            alerts_enabled: self.alerts_enabled.unwrap_or(true),
            manual_pair: self.manual_pair(),
            max_cycles: self.max_cycles,
        }
    }
}

/// Validate effective config (used by --check-config and before any scan)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    if let (Some(min), Some(max)) = (cfg.min_memory_kb, cfg.max_memory_kb) {
        if min > max {
            return Err(ConfigError::Invalid(format!(
                "min_memory_kb ({}) is greater than max_memory_kb ({})",
                min, max
            )));
        }
    }

    if cfg.interval_seconds == Some(0) {
        return Err(ConfigError::Invalid(
            "interval_seconds must be greater than 0".into(),
        ));
    }

    if cfg.max_cycles == Some(0) {
        return Err(ConfigError::Invalid(
            "max_cycles must be greater than 0".into(),
        ));
    }

    if let Some(pair) = &cfg.pair {
        match pair.as_slice() {
            [first, second] if first != second => {}
            [_, _] => {
                return Err(ConfigError::Invalid(
                    "pair must name two different processes".into(),
                ));
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "pair expects exactly 2 indices, got {}",
                    other.len()
                )));
            }
        }
    }

    if let Some(owner) = &cfg.owner {
        if owner.trim().is_empty() {
            return Err(ConfigError::Invalid("owner filter must not be blank".into()));
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level.to_ascii_lowercase().as_str() {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "Invalid log_level '{}', expected off/error/warn/info/debug/trace",
                    other
                )));
            }
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if args.min_memory_kb.is_some() {
        config.min_memory_kb = args.min_memory_kb;
    }
    if args.max_memory_kb.is_some() {
        config.max_memory_kb = args.max_memory_kb;
    }
    if args.min_cpu_ticks.is_some() {
        config.min_cpu_ticks = args.min_cpu_ticks;
    }
    if let Some(command) = &args.command_filter {
        config.command = Some(command.clone());
    }
    if let Some(owner) = &args.owner {
        config.owner = Some(owner.clone());
    }
    if args.sort_by.is_some() {
        config.sort_by = args.sort_by;
    }
    if args.order.is_some() {
        config.sort_order = args.order;
    }
    if args.parallelism.is_some() {
        config.parallelism = args.parallelism;
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(test_file) = &args.test_data_file {
        config.test_data_file = Some(test_file.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    if let Some(command) = &args.command {
        apply_command_overrides(&mut config, command);
    }

    Ok(config)
}

/// Subcommand options win over both file and global flags.
pub fn apply_command_overrides(config: &mut Config, command: &Commands) {
    match command {
        Commands::Best { pair, .. } => {
            if pair.is_some() {
                config.pair = pair.clone();
            }
        }
        Commands::Monitor {
            interval,
            pair,
            no_alerts,
            no_desktop,
            count,
        } => {
            if interval.is_some() {
                config.interval_seconds = *interval;
            }
            if pair.is_some() {
                config.pair = pair.clone();
            }
            if *no_alerts {
                config.alerts_enabled = Some(false);
            }
            if *no_desktop {
                config.desktop_notifications = Some(false);
            }
            if count.is_some() {
                config.max_cycles = *count;
            }
        }
        Commands::List { .. } | Commands::Check | Commands::GenerateTestdata { .. } => {}
    }
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            // Try default locations
            let defaults = [
                "/etc/procpair/procpair.yaml",
                "/etc/procpair/procpair.yml",
                "/etc/procpair/procpair.json",
                "./procpair.yaml",
                "./procpair.yml",
                "./procpair.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let shown = path.display().to_string();
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;

    let parse_err = |message: String| ConfigError::Parse {
        path: shown.clone(),
        message,
    };

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
        Some("toml") => toml::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
        // Default to YAML
        _ => serde_yaml::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
    };

    info!("Loaded configuration from: {}", shown);
    Ok(config)
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: ConfigFormat) -> Result<String, String> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
    }
}
