//! JSON process snapshots used instead of a live /proc scan.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::process::{ProcessRecord, RecordSource, ScanReport};

/// Root structure for snapshot JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub version: String,
    pub generated_at: String,
    pub processes: Vec<ProcessRecord>,
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot_from_file(path: &Path) -> Result<SnapshotFile, String> {
    debug!("Loading snapshot from: {}", path.display());

    if !path.exists() {
        return Err(format!("Snapshot file not found: {}", path.display()));
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read snapshot file: {}", e))?;
    let snapshot: SnapshotFile = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse snapshot JSON: {}", e))?;

    info!(
        "Loaded snapshot version {} from {} ({} processes)",
        snapshot.version,
        snapshot.generated_at,
        snapshot.processes.len()
    );

    Ok(snapshot)
}

/// Serves the same snapshot on every scan.
pub struct SnapshotSource {
    records: Vec<ProcessRecord>,
}

impl SnapshotSource {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self { records }
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        load_snapshot_from_file(path).map(|s| Self::new(s.processes))
    }
}

impl RecordSource for SnapshotSource {
    fn scan(&self) -> ScanReport {
        ScanReport {
            records: self.records.clone(),
            ..Default::default()
        }
    }
}
