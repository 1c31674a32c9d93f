//! Best command implementation.
//!
//! Finds (or takes the manually selected) best pair and renders it.

use procpair::cli::OutputFormat;
use procpair::config::Config;
use procpair::{resolve_pair, Selection};

use super::list::{header_line, record_line};
use super::{build_collector, build_source};

/// Shows the best matching pair.
pub fn command_best(format: OutputFormat, config: &Config) -> anyhow::Result<()> {
    let source = build_source(config)?;
    let set = build_collector(source.as_ref(), config).collect()?;
    let result = resolve_pair(&set, config.manual_pair())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            let how = match &result.selection {
                Selection::Searched { evaluated_pairs } => {
                    format!("searched {} pairs of {} processes", evaluated_pairs, set.len())
                }
                Selection::Manual => "manual selection".to_string(),
            };

            println!("Best pair (score {}, {})", result.score, how);
            println!("{}", header_line());
            println!("{}", record_line(result.first_index, &result.first));
            println!("{}", record_line(result.second_index, &result.second));
        }
    }

    Ok(())
}
