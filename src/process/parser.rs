//! Record parsing for `/proc/<pid>/stat` and `/proc/<pid>/status`.
//!
//! The stat line is positional: `pid (comm) state ppid ...`. The command may
//! itself contain spaces and parentheses, so it is taken as everything
//! between the first `(` and the last `)`. The remaining fields are read at
//! fixed offsets; anything missing or malformed defaults to zero so that
//! field-count drift between kernel versions never drops a record.

use std::io;
use tracing::debug;

use crate::process::record::{format_start_epoch, ProcessRecord};
use crate::process::scanner::ProcessSource;
use crate::process::users::UserResolver;
use crate::system::SystemContext;

// Offsets into the fields following the closing parenthesis.
const STATE_OFFSET: usize = 0;
const UTIME_OFFSET: usize = 11;
const STIME_OFFSET: usize = 12;
const NICE_OFFSET: usize = 16;
const START_TIME_OFFSET: usize = 19;

/// Scheduling fields extracted from one stat line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatFields {
    pub command: String,
    pub state: Option<String>,
    pub utime: u64,
    pub stime: u64,
    pub nice: i64,
    pub start_ticks: u64,
}

impl StatFields {
    pub fn cpu_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

/// Fields of interest from the status table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFields {
    pub memory_kb: u64,
    pub state: Option<String>,
    pub uid: u32,
}

/// Result of reading one process.
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed(ProcessRecord),
    /// The process exited between discovery and read.
    Vanished,
    /// The backing files exist but could not be read (e.g. permissions).
    Unreadable(io::Error),
}

/// Splits a stat line into the command and the positional fields after it.
pub fn parse_stat_line(line: &str) -> StatFields {
    let (open, close) = match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => return StatFields::default(),
    };

    let command = line[open + 1..close].to_string();
    let rest: Vec<&str> = line[close + 1..].split_whitespace().collect();
    let field = |idx: usize| rest.get(idx).copied();

    StatFields {
        command,
        state: field(STATE_OFFSET).map(str::to_string),
        utime: field(UTIME_OFFSET).and_then(|v| v.parse().ok()).unwrap_or(0),
        stime: field(STIME_OFFSET).and_then(|v| v.parse().ok()).unwrap_or(0),
        nice: field(NICE_OFFSET).and_then(|v| v.parse().ok()).unwrap_or(0),
        start_ticks: field(START_TIME_OFFSET)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
    }
}

/// Parses `VmRSS`, `State` and the real uid from a status table.
pub fn parse_status(content: &str) -> StatusFields {
    let mut fields = StatusFields::default();

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("VmRSS:") {
            fields.memory_kb = first_token(v).and_then(|t| t.parse().ok()).unwrap_or(0);
        } else if let Some(v) = line.strip_prefix("State:") {
            fields.state = first_token(v).map(str::to_string);
        } else if let Some(v) = line.strip_prefix("Uid:") {
            fields.uid = first_token(v).and_then(|t| t.parse().ok()).unwrap_or(0);
        }
    }

    fields
}

fn first_token(v: &str) -> Option<&str> {
    v.split_whitespace().next()
}

/// Builds a record from already-read stat and status contents.
pub fn build_record(
    pid: u32,
    stat_line: &str,
    status: &str,
    ctx: &SystemContext,
    users: &UserResolver,
) -> ProcessRecord {
    let stat = parse_stat_line(stat_line);
    let status = parse_status(status);
    let cpu_ticks = stat.cpu_ticks();
    let start_epoch = ctx.start_epoch(stat.start_ticks);

    ProcessRecord {
        pid,
        state: stat
            .state
            .or(status.state)
            .unwrap_or_else(|| "?".to_string()),
        command: stat.command,
        memory_kb: status.memory_kb,
        cpu_ticks,
        nice: stat.nice,
        start_epoch,
        start_formatted: format_start_epoch(start_epoch),
        uid: status.uid,
        user: users.resolve(status.uid),
    }
}

/// Reads and parses one process from the given source.
pub fn read_process<S: ProcessSource + ?Sized>(
    source: &S,
    pid: u32,
    ctx: &SystemContext,
    users: &UserResolver,
) -> ParseOutcome {
    let stat = match source.read_stat(pid) {
        Ok(s) => s,
        Err(e) => return outcome_for_error(pid, e),
    };
    let status = match source.read_status(pid) {
        Ok(s) => s,
        Err(e) => return outcome_for_error(pid, e),
    };

    ParseOutcome::Parsed(build_record(pid, stat.trim_end(), &status, ctx, users))
}

fn outcome_for_error(pid: u32, e: io::Error) -> ParseOutcome {
    if is_vanished(&e) {
        ParseOutcome::Vanished
    } else {
        debug!("Failed to read process {}: {}", pid, e);
        ParseOutcome::Unreadable(e)
    }
}

/// `ENOENT` and `ESRCH` both mean the process went away mid-scan.
fn is_vanished(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::NotFound || e.raw_os_error() == Some(libc::ESRCH)
}
