//! Monitor command implementation.
//!
//! Runs the best-pair monitor loop until SIGINT/SIGTERM or the configured
//! cycle count.

use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, info};

use procpair::config::Config;
use procpair::{CompositeNotifier, LogNotifier, MonitorLoop};

use super::{build_collector, build_source};

/// Runs the monitor loop.
pub async fn command_monitor(config: &Config) -> anyhow::Result<()> {
    let source = build_source(config)?;
    let collector = build_collector(source.as_ref(), config);
    let notifier = build_notifier(config);
    let settings = config.monitor_settings();

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = cancel_tx.send(true);
    });

    let mut monitor = MonitorLoop::new(collector, &notifier, settings);
    let summary = monitor.run(cancel_rx).await;

    println!(
        "Monitor stopped: {} cycle(s), {} skipped, {} alert(s)",
        summary.cycles, summary.failed_cycles, summary.alerts
    );
    Ok(())
}

fn build_notifier(config: &Config) -> CompositeNotifier {
    let mut notifier = CompositeNotifier::new();
    notifier.push(Box::new(LogNotifier));

    #[cfg(feature = "desktop")]
    if config.desktop_notifications.unwrap_or(true) {
        notifier.push(Box::new(procpair::notifier::DesktopNotifier));
    }

    debug!(
        "{} notifier(s) configured (desktop notifications {})",
        notifier.len(),
        if config.desktop_notifications.unwrap_or(true) { "requested" } else { "off" }
    );
    notifier
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
