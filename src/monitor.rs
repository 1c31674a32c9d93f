//! Periodic best-pair monitoring with change alerts.
//!
//! Each cycle scans, pairs and compares the new pair identity with the one
//! from the previous cycle. The first cycle never alerts. Between cycles the
//! loop sleeps for the configured interval; a cancellation signal aborts the
//! sleep, while a scan that is already running is allowed to finish.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::PairError;
use crate::notifier::{AlertEvent, Notifier};
use crate::pair::{resolve_pair, BestPairResult, PairIdentity};
use crate::process::ProcessCollector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Scanning,
    Comparing,
    AlertPending,
    Sleeping,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub alerts_enabled: bool,
    pub manual_pair: Option<(usize, usize)>,
    /// Stop after this many cycles. `None` runs until cancelled.
    pub max_cycles: Option<u64>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            alerts_enabled: true,
            manual_pair: None,
            max_cycles: None,
        }
    }
}

/// Outcome of one successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub result: BestPairResult,
    pub matched: usize,
    /// The pair differs from the previous cycle's pair.
    pub changed: bool,
    /// An alert was delivered for this cycle.
    pub alerted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub alerts: u64,
}

pub struct MonitorLoop<'a> {
    collector: ProcessCollector<'a>,
    notifier: &'a dyn Notifier,
    settings: MonitorSettings,
    previous: Option<PairIdentity>,
    state: MonitorState,
}

impl<'a> MonitorLoop<'a> {
    pub fn new(
        collector: ProcessCollector<'a>,
        notifier: &'a dyn Notifier,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            collector,
            notifier,
            settings,
            previous: None,
            state: MonitorState::Idle,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn previous_identity(&self) -> Option<&PairIdentity> {
        self.previous.as_ref()
    }

    /// Runs one scan/compare cycle. On error the previous identity is kept.
    pub fn run_cycle(&mut self) -> Result<CycleReport, PairError> {
        let outcome = self.scan_and_compare();
        self.state = MonitorState::Sleeping;
        outcome
    }

    fn scan_and_compare(&mut self) -> Result<CycleReport, PairError> {
        self.state = MonitorState::Scanning;
        let set = self.collector.collect()?;

        self.state = MonitorState::Comparing;
        let result = resolve_pair(&set, self.settings.manual_pair)?;
        let identity = result.identity();
        let changed = self.previous.as_ref().is_some_and(|prev| *prev != identity);

        let mut alerted = false;
        if changed {
            self.state = MonitorState::AlertPending;
            if self.settings.alerts_enabled {
                let event = AlertEvent::from_result(&result);
                match self.notifier.notify(&event) {
                    Ok(()) => alerted = true,
                    Err(e) => warn!("Alert delivery failed: {}", e),
                }
            } else {
                debug!("Best pair changed, alerts disabled");
            }
        }

        self.previous = Some(identity);

        Ok(CycleReport {
            result,
            matched: set.len(),
            changed,
            alerted,
        })
    }

    /// Runs cycles until `cancel` becomes true (or its sender is dropped),
    /// or until `max_cycles` is reached.
    pub async fn run(&mut self, mut cancel: watch::Receiver<bool>) -> MonitorSummary {
        let mut summary = MonitorSummary::default();
        info!(
            "Monitor started (interval {}s, alerts {})",
            self.settings.interval.as_secs_f64(),
            if self.settings.alerts_enabled { "on" } else { "off" }
        );

        loop {
            if *cancel.borrow() {
                break;
            }

            summary.cycles += 1;
            match self.run_cycle() {
                Ok(report) => {
                    if report.alerted {
                        summary.alerts += 1;
                    }
                    info!(
                        cycle = summary.cycles,
                        matched = report.matched,
                        score = report.result.score,
                        changed = report.changed,
                        "Cycle complete: PID {} ({}) <-> PID {} ({})",
                        report.result.first.pid,
                        report.result.first.command,
                        report.result.second.pid,
                        report.result.second.command
                    );
                }
                Err(e) => {
                    summary.failed_cycles += 1;
                    warn!(cycle = summary.cycles, "Cycle skipped: {}", e);
                }
            }

            if self
                .settings
                .max_cycles
                .is_some_and(|max| summary.cycles >= max)
            {
                break;
            }

            if !sleep_or_cancel(self.settings.interval, &mut cancel).await {
                break;
            }
        }

        self.state = MonitorState::Stopped;
        info!(
            "Monitor stopped after {} cycle(s), {} alert(s)",
            summary.cycles, summary.alerts
        );
        summary
    }
}

/// Sleeps for the full interval. Returns `false` as soon as cancellation is
/// requested or the sender is dropped; other value changes keep the deadline.
async fn sleep_or_cancel(interval: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    return false;
                }
            }
        }
    }
}
