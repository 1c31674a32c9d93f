//! Process scanning utilities for discovering and reading process entries from /proc.
//!
//! Pids are enumerated in ascending order and parsed in parallel with rayon.
//! `par_iter().collect()` keeps the input order, so the resulting record list
//! is reproducible for a fixed process table.

use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use crate::process::parser::{read_process, ParseOutcome};
use crate::process::record::ProcessRecord;
use crate::process::users::UserResolver;
use crate::system::SystemContext;

/// Raw per-process data access.
pub trait ProcessSource: Send + Sync {
    /// Identifiers of all currently visible processes.
    fn list_pids(&self) -> Vec<u32>;
    fn read_stat(&self, pid: u32) -> io::Result<String>;
    fn read_status(&self, pid: u32) -> io::Result<String>;
}

/// `ProcessSource` over a procfs mount (normally `/proc`).
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcessSource for ProcFs {
    fn list_pids(&self) -> Vec<u32> {
        collect_pids(&self.root)
    }

    fn read_stat(&self, pid: u32) -> io::Result<String> {
        read_lossy(&self.root.join(pid.to_string()).join("stat"))
    }

    fn read_status(&self, pid: u32) -> io::Result<String> {
        read_lossy(&self.root.join(pid.to_string()).join("status"))
    }
}

/// Process names may hold arbitrary bytes; invalid UTF-8 is replaced
/// instead of failing the whole record.
fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Scans a procfs root for numeric directory names, sorted ascending.
pub fn collect_pids(root: &Path) -> Vec<u32> {
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = match name.to_str() {
                Some(v) => v,
                None => continue,
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Ok(pid) = name.parse::<u32>() {
                if pid > 0 {
                    out.push(pid);
                }
            }
        }
    }
    out.sort_unstable();
    out
}

/// Records from one scan plus counts of what was dropped.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub records: Vec<ProcessRecord>,
    pub vanished: usize,
    pub unreadable: usize,
}

/// Anything that can produce a full process snapshot.
pub trait RecordSource: Send + Sync {
    fn scan(&self) -> ScanReport;
}

/// Live scanner: enumerates pids and parses each one in parallel.
pub struct ProcScanner<S: ProcessSource> {
    source: S,
    ctx: SystemContext,
    users: UserResolver,
}

impl<S: ProcessSource> ProcScanner<S> {
    pub fn new(source: S, ctx: SystemContext, users: UserResolver) -> Self {
        Self { source, ctx, users }
    }

    pub fn context(&self) -> &SystemContext {
        &self.ctx
    }
}

impl<S: ProcessSource> RecordSource for ProcScanner<S> {
    fn scan(&self) -> ScanReport {
        scan_processes(&self.source, &self.ctx, &self.users)
    }
}

/// Parses every visible process. Vanished and unreadable processes are
/// dropped and only counted.
pub fn scan_processes<S: ProcessSource + ?Sized>(
    source: &S,
    ctx: &SystemContext,
    users: &UserResolver,
) -> ScanReport {
    let pids = source.list_pids();
    debug!("Collected {} process entries", pids.len());

    let vanished = AtomicUsize::new(0);
    let unreadable = AtomicUsize::new(0);

    let records: Vec<ProcessRecord> = pids
        .par_iter()
        .filter_map(|&pid| match read_process(source, pid, ctx, users) {
            ParseOutcome::Parsed(record) => Some(record),
            ParseOutcome::Vanished => {
                vanished.fetch_add(1, Ordering::Relaxed);
                None
            }
            ParseOutcome::Unreadable(_) => {
                unreadable.fetch_add(1, Ordering::Relaxed);
                None
            }
        })
        .collect();

    ScanReport {
        records,
        vanished: vanished.into_inner(),
        unreadable: unreadable.into_inner(),
    }
}
