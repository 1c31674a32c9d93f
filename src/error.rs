//! Error types shared by the collector, pair finder, monitor loop and notifiers.

use thiserror::Error;

/// Errors reported by the collection and pairing stages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairError {
    #[error("insufficient data: {found} matching process(es), at least 2 required")]
    InsufficientData { found: usize },

    #[error("invalid pair selection ({first}, {second}) for {len} matching processes")]
    InvalidSelection {
        first: usize,
        second: usize,
        len: usize,
    },
}

/// Invalid filter, sort, interval or file configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Alert delivery failures. Never fatal to the monitor loop.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("failed to send notification: {0}")]
    SendFailed(String),
}
