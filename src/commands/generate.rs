//! Generate testdata command implementation.
//!
//! Generates synthetic snapshot JSON files usable with `--test-data-file`.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use procpair::process::format_start_epoch;
use procpair::snapshot::SnapshotFile;
use procpair::ProcessRecord;

const COMMANDS: &[&str] = &[
    "systemd",
    "sshd",
    "nginx",
    "postgres",
    "redis-server",
    "bash",
    "python3",
    "node",
    "java",
    "Web Content",
    "kworker/0:1-events",
    "(sd-pam)",
];

const USERS: &[(u32, &str)] = &[(0, "root"), (33, "www-data"), (999, "postgres"), (1000, "alice")];

const STATES: &[&str] = &["S", "R", "D", "I", "Z"];

/// Generates a synthetic snapshot JSON file for testing purposes.
pub fn command_generate_testdata(output: PathBuf, count: usize) -> anyhow::Result<()> {
    debug!(
        "Generating snapshot: count={}, output={}",
        count,
        output.display()
    );

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let processes: Vec<ProcessRecord> = (0..count)
        .map(|i| generate_random_process(&mut rng, 1000 + i as u32, now.timestamp()))
        .collect();

    let snapshot = SnapshotFile {
        version: "1.0".to_string(),
        generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        processes,
    };

    // Write to file as pretty-printed JSON
    let json_content = serde_json::to_string_pretty(&snapshot)?;
    fs::write(&output, &json_content)?;

    println!(
        "✅ Generated snapshot: {} processes in {}",
        snapshot.processes.len(),
        output.display()
    );

    Ok(())
}

/// Generates a random process with plausible memory and CPU values.
fn generate_random_process(rng: &mut impl Rng, pid: u32, now: i64) -> ProcessRecord {
    let command = COMMANDS.choose(rng).copied().unwrap_or("process");
    let (uid, user) = USERS.choose(rng).copied().unwrap_or((0, "root"));
    let state = STATES.choose(rng).copied().unwrap_or("S");

    // RSS: 0 - 2 GB in KB (kernel threads report 0)
    let memory_kb = if command.starts_with("kworker") {
        0
    } else {
        rng.gen_range(1024..2 * 1024 * 1024_u64)
    };
    let cpu_ticks = rng.gen_range(0..1_000_000_u64);
    let nice = rng.gen_range(-20..20_i64);
    // Started within the last 30 days
    let start_epoch = now - rng.gen_range(0..30 * 24 * 3600_i64);

    ProcessRecord {
        pid,
        command: command.to_string(),
        memory_kb,
        cpu_ticks,
        state: state.to_string(),
        nice,
        start_epoch,
        start_formatted: format_start_epoch(start_epoch),
        uid,
        user: user.to_string(),
    }
}
