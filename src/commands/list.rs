//! List command implementation.
//!
//! Renders every process that passes the configured filters.

use procpair::cli::OutputFormat;
use procpair::config::Config;
use procpair::ProcessRecord;

use super::{build_collector, build_source};

/// Lists all matching processes.
pub fn command_list(
    format: OutputFormat,
    limit: Option<usize>,
    config: &Config,
) -> anyhow::Result<()> {
    let source = build_source(config)?;
    let set = build_collector(source.as_ref(), config).collect_matches();

    let shown: Vec<&ProcessRecord> = set
        .records()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Text => {
            println!("{}", header_line());
            for (index, record) in shown.iter().enumerate() {
                println!("{}", record_line(index, record));
            }
            println!("\n{} matching process(es)", set.len());
        }
    }

    Ok(())
}

pub fn header_line() -> String {
    format!(
        "{:>5} {:>7} {:<10} {:>10} {:>10} {:<5} {:>4} {:<19} COMMAND",
        "IDX", "PID", "USER", "MEM_KB", "CPU_TICKS", "STATE", "NI", "STARTED"
    )
}

pub fn record_line(index: usize, r: &ProcessRecord) -> String {
    format!(
        "{:>5} {:>7} {:<10} {:>10} {:>10} {:<5} {:>4} {:<19} {}",
        index, r.pid, r.user, r.memory_kb, r.cpu_ticks, r.state, r.nice, r.start_formatted, r.command
    )
}
