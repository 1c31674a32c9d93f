//! procpair - version 0.1.0
//!
//! Process pair finder with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod commands;

use clap::Parser;
use tracing::{debug, error, info};

use procpair::cli::{Args, Commands, OutputFormat};
use procpair::config::{render_config, resolve_config, validate_effective_config, Config};

use commands::{
    command_best, command_check, command_generate_testdata, command_list, command_monitor,
};

/// Initializes tracing logging subsystem with the effective log level.
fn setup_logging(config: &Config) {
    let log_level = match config.tracing_level() {
        Some(level) => level,
        None => return,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {}", log_level);
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // CLI > config file > defaults, including the log level
    let config = resolve_config(&args)?;
    setup_logging(&config);

    if args.show_config {
        let rendered = render_config(&config, args.config_format.clone())
            .map_err(anyhow::Error::msg)?;
        println!("{rendered}");
        return Ok(());
    }

    // Check reports invalid configuration itself instead of exiting early
    if let Some(Commands::Check) = &args.command {
        return command_check(&config);
    }

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if args.check_config {
        println!("✅ Configuration is valid");
        return Ok(());
    }

    // Configure parallel processing
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }

    match &args.command {
        Some(Commands::List { format, limit }) => command_list(*format, *limit, &config),
        Some(Commands::Best { format, .. }) => command_best(*format, &config),
        Some(Commands::Monitor { .. }) => command_monitor(&config).await,
        Some(Commands::GenerateTestdata { output, count }) => {
            command_generate_testdata(output.clone(), *count)
        }
        Some(Commands::Check) => command_check(&config),
        // Without a subcommand, show the best pair
        None => command_best(OutputFormat::Text, &config),
    }
}
