//! Process-related modules for reading, filtering and collecting process records.
//!
//! This module provides:
//! - `record`: The `ProcessRecord` snapshot and sort keys
//! - `parser`: Parsing of /proc/<pid>/stat and /proc/<pid>/status
//! - `users`: uid to user name resolution
//! - `scanner`: Process discovery and parallel parsing
//! - `filter`: Filter predicates and the `MatchSet`
//! - `collector`: Scan, filter and sort for one cycle

pub mod collector;
pub mod filter;
pub mod parser;
pub mod record;
pub mod scanner;
pub mod users;

// Re-export commonly used types
pub use collector::ProcessCollector;
pub use filter::{filter_records, FilterCriteria, MatchSet, OwnerFilter};
pub use parser::{build_record, parse_stat_line, parse_status, read_process, ParseOutcome};
pub use record::{format_start_epoch, sort_records, ProcessRecord, SortField, SortOrder};
pub use scanner::{
    collect_pids, scan_processes, ProcFs, ProcScanner, ProcessSource, RecordSource, ScanReport,
};
pub use users::{SystemUsers, UserLookup, UserResolver};
