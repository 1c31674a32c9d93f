//! Process record snapshot and the sort keys applied to a match set.

use chrono::{Local, TimeZone};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Immutable snapshot of one process at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub command: String,
    pub memory_kb: u64,
    pub cpu_ticks: u64,
    pub state: String,
    pub nice: i64,
    pub start_epoch: i64,
    pub start_formatted: String,
    pub uid: u32,
    pub user: String,
}

impl ProcessRecord {
    /// One-line summary used by alerts and text output.
    pub fn summary(&self) -> String {
        format!(
            "{} (PID {}, user {}, {} KB, {} ticks)",
            self.command, self.pid, self.user, self.memory_kb, self.cpu_ticks
        )
    }
}

/// Renders a start epoch as local time. Falls back to the raw epoch
/// when the value is out of range for the local timezone.
pub fn format_start_epoch(epoch: i64) -> String {
    match Local.timestamp_opt(epoch, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch.to_string(),
    }
}

/// Field used to order the match set before pairing and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Pid,
    Memory,
    Cpu,
    Command,
    User,
    Start,
    Nice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

fn compare_by(field: SortField, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
    match field {
        SortField::Pid => a.pid.cmp(&b.pid),
        SortField::Memory => a.memory_kb.cmp(&b.memory_kb),
        SortField::Cpu => a.cpu_ticks.cmp(&b.cpu_ticks),
        SortField::Command => a.command.cmp(&b.command),
        SortField::User => a.user.cmp(&b.user),
        SortField::Start => a.start_epoch.cmp(&b.start_epoch),
        SortField::Nice => a.nice.cmp(&b.nice),
    }
}

/// Stable sort; records with equal keys keep their enumeration order.
pub fn sort_records(records: &mut [ProcessRecord], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord = compare_by(field, a, b);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
pub(crate) fn test_record(pid: u32, command: &str, memory_kb: u64, cpu_ticks: u64) -> ProcessRecord {
    ProcessRecord {
        pid,
        command: command.to_string(),
        memory_kb,
        cpu_ticks,
        state: "S".to_string(),
        nice: 0,
        start_epoch: 0,
        start_formatted: String::new(),
        uid: 1000,
        user: "alice".to_string(),
    }
}
