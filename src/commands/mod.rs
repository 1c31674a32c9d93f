//! CLI command implementations for procpair.
//!
//! This module provides implementations for all CLI subcommands:
//! - `list`: Render the match set
//! - `best`: Render the best pair
//! - `monitor`: Periodic best-pair monitoring with alerts
//! - `check`: System validation
//! - `generate`: Synthetic snapshot generation

pub mod best;
pub mod check;
pub mod generate;
pub mod list;
pub mod monitor;

// Re-export command functions
pub use best::command_best;
pub use check::command_check;
pub use generate::command_generate_testdata;
pub use list::command_list;
pub use monitor::command_monitor;

use anyhow::{anyhow, Context};
use tracing::info;

use procpair::config::Config;
use procpair::process::{ProcFs, ProcScanner, ProcessCollector, RecordSource, UserResolver};
use procpair::snapshot::SnapshotSource;
use procpair::SystemContext;

/// Builds the record source: a JSON snapshot when configured, otherwise a
/// live procfs scan with host constants resolved once here.
pub fn build_source(config: &Config) -> anyhow::Result<Box<dyn RecordSource>> {
    if let Some(test_file) = &config.test_data_file {
        info!("Using snapshot data from file: {}", test_file.display());
        let source = SnapshotSource::from_file(test_file).map_err(|e| anyhow!(e))?;
        return Ok(Box::new(source));
    }

    let root = config.proc_root();
    let ctx = SystemContext::detect(&root)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to resolve boot time from {}", root.display()))?;
    info!(
        "System context: {} ticks/s, boot epoch {}",
        ctx.clock_ticks_per_second, ctx.boot_epoch
    );

    Ok(Box::new(ProcScanner::new(
        ProcFs::new(root),
        ctx,
        UserResolver::system(),
    )))
}

pub fn build_collector<'a>(source: &'a dyn RecordSource, config: &Config) -> ProcessCollector<'a> {
    let (field, order) = config.sort();
    ProcessCollector::new(source, config.filter_criteria()).with_sort(field, order)
}
