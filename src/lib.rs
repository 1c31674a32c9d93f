//! procpair library
//!
//! Inventories running processes from `/proc`, filters them, and finds the
//! pair of processes whose combined memory/CPU profile is most similar. A
//! monitor loop repeats the search on an interval and alerts when the best
//! pair changes.
//!
//! # Pipeline
//!
//! - **Parsing**: `/proc/<pid>/stat` + `/proc/<pid>/status` → [`ProcessRecord`]
//! - **Collection**: parallel scan, filter predicates, sort → [`MatchSet`]
//! - **Pairing**: exhaustive minimal-score search → [`BestPairResult`]
//! - **Monitoring**: periodic cycles with change alerts → [`MonitorLoop`]
//!
//! # Usage
//!
//! ```rust
//! use procpair::{find_best_pair, filter_records, FilterCriteria, ProcessRecord};
//!
//! let record = |pid: u32, memory_kb: u64, cpu_ticks: u64| ProcessRecord {
//!     pid,
//!     command: format!("worker-{pid}"),
//!     memory_kb,
//!     cpu_ticks,
//!     state: "S".into(),
//!     nice: 0,
//!     start_epoch: 0,
//!     start_formatted: String::new(),
//!     uid: 1000,
//!     user: "alice".into(),
//! };
//!
//! let set = filter_records(
//!     vec![record(1, 1000, 10), record(2, 5000, 10), record(3, 1100, 15)],
//!     &FilterCriteria::default(),
//! );
//! let best = find_best_pair(&set).unwrap();
//! assert_eq!((best.first.pid, best.second.pid), (1, 3));
//! assert_eq!(best.score, 105);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notifier;
pub mod pair;
pub mod process;
pub mod snapshot;
pub mod system;

// Re-export main types for convenience
pub use error::{ConfigError, NotificationError, PairError};
pub use monitor::{CycleReport, MonitorLoop, MonitorSettings, MonitorState, MonitorSummary};
pub use notifier::{AlertEvent, CompositeNotifier, LogNotifier, Notifier};
pub use pair::{
    find_best_pair, pair_score, resolve_pair, select_pair, BestPairResult, PairIdentity, Selection,
};
pub use process::{
    filter_records, FilterCriteria, MatchSet, ProcessCollector, ProcessRecord, RecordSource,
    ScanReport, SortField, SortOrder,
};
pub use system::SystemContext;
