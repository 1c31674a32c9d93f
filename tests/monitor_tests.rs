//! Integration tests for the monitor loop: change detection, alert delivery
//! and cancellation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use procpair::{
    AlertEvent, FilterCriteria, MonitorLoop, MonitorSettings, MonitorState, NotificationError,
    Notifier, ProcessCollector, ProcessRecord, RecordSource, ScanReport,
};
use tokio::sync::watch;

fn record(pid: u32, memory_kb: u64, cpu_ticks: u64) -> ProcessRecord {
    ProcessRecord {
        pid,
        command: format!("proc-{pid}"),
        memory_kb,
        cpu_ticks,
        state: "S".to_string(),
        nice: 0,
        start_epoch: 0,
        start_formatted: String::new(),
        uid: 0,
        user: "root".to_string(),
    }
}

/// Best pair is (1, 2) with score 10.
fn snapshot_a() -> Vec<ProcessRecord> {
    vec![record(1, 100, 0), record(2, 110, 0), record(3, 900, 0)]
}

/// Best pair is (2, 3) with score 5.
fn snapshot_b() -> Vec<ProcessRecord> {
    vec![record(1, 100, 0), record(2, 500, 0), record(3, 505, 0)]
}

/// Serves a scripted sequence of snapshots, repeating the last one.
struct Scripted {
    queue: Mutex<VecDeque<Vec<ProcessRecord>>>,
    last: Mutex<Vec<ProcessRecord>>,
}

impl Scripted {
    fn new(snapshots: Vec<Vec<ProcessRecord>>) -> Self {
        Self {
            queue: Mutex::new(snapshots.into()),
            last: Mutex::new(Vec::new()),
        }
    }
}

impl RecordSource for Scripted {
    fn scan(&self) -> ScanReport {
        let mut last = self.last.lock().expect("lock poisoned");
        if let Some(next) = self.queue.lock().expect("lock poisoned").pop_front() {
            *last = next;
        }
        ScanReport {
            records: last.clone(),
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<AlertEvent>>,
}

impl Notifier for Recording {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotificationError> {
        self.events.lock().expect("lock poisoned").push(event.clone());
        Ok(())
    }
}

struct Unavailable(Arc<AtomicUsize>);

impl Notifier for Unavailable {
    fn notify(&self, _event: &AlertEvent) -> Result<(), NotificationError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Err(NotificationError::ChannelUnavailable("no backend".to_string()))
    }
}

fn settings() -> MonitorSettings {
    MonitorSettings {
        interval: Duration::from_millis(1),
        ..Default::default()
    }
}

#[test]
fn test_alert_only_on_transition_a_a_b() {
    let source = Scripted::new(vec![snapshot_a(), snapshot_a(), snapshot_b()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(collector, &notifier, settings());

    let first = monitor.run_cycle().expect("cycle 1");
    assert!(!first.changed, "first cycle never alerts");
    let second = monitor.run_cycle().expect("cycle 2");
    assert!(!second.changed);
    assert!(notifier.events.lock().expect("lock poisoned").is_empty());

    let third = monitor.run_cycle().expect("cycle 3");
    assert!(third.changed);
    assert!(third.alerted);

    let events = notifier.events.lock().expect("lock poisoned");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].score, 5);
    assert!(events[0].first.contains("PID 2"));
    assert!(events[0].second.contains("PID 3"));
}

#[test]
fn test_alerts_disabled_still_tracks_identity() {
    let source = Scripted::new(vec![snapshot_a(), snapshot_b(), snapshot_b()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(
        collector,
        &notifier,
        MonitorSettings {
            alerts_enabled: false,
            ..settings()
        },
    );

    monitor.run_cycle().expect("cycle 1");
    let second = monitor.run_cycle().expect("cycle 2");
    assert!(second.changed);
    assert!(!second.alerted);
    let third = monitor.run_cycle().expect("cycle 3");
    assert!(!third.changed);
    assert!(notifier.events.lock().expect("lock poisoned").is_empty());
}

#[test]
fn test_notification_failure_is_not_fatal() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let notifier = Unavailable(attempts.clone());
    let source = Scripted::new(vec![snapshot_a(), snapshot_b(), snapshot_a()]);
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(collector, &notifier, settings());

    monitor.run_cycle().expect("cycle 1");
    let second = monitor.run_cycle().expect("cycle 2 survives failed delivery");
    assert!(second.changed);
    assert!(!second.alerted);
    let third = monitor.run_cycle().expect("cycle 3");
    assert!(third.changed);
    assert_eq!(attempts.load(Ordering::Relaxed), 2);
}

#[test]
fn test_manual_pair_override_in_cycle() {
    let source = Scripted::new(vec![snapshot_a()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(
        collector,
        &notifier,
        MonitorSettings {
            manual_pair: Some((0, 2)),
            ..settings()
        },
    );

    let report = monitor.run_cycle().expect("cycle");
    assert_eq!(report.result.first.pid, 1);
    assert_eq!(report.result.second.pid, 3);
    assert_eq!(report.result.score, 800);
}

#[tokio::test]
async fn test_run_stops_after_max_cycles() {
    let source = Scripted::new(vec![snapshot_a(), snapshot_a(), snapshot_b()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(
        collector,
        &notifier,
        MonitorSettings {
            max_cycles: Some(3),
            ..settings()
        },
    );

    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let summary = monitor.run(cancel_rx).await;

    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.alerts, 1);
    assert_eq!(monitor.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_cancel_before_start_runs_no_cycles() {
    let source = Scripted::new(vec![snapshot_a()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(collector, &notifier, settings());

    let (cancel_tx, cancel_rx) = watch::channel(false);
    cancel_tx.send(true).expect("receiver alive");
    let summary = monitor.run(cancel_rx).await;

    assert_eq!(summary.cycles, 0);
    assert!(monitor.previous_identity().is_none());
}

#[tokio::test]
async fn test_cancel_aborts_pending_sleep() {
    let source = Scripted::new(vec![snapshot_a()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(
        collector,
        &notifier,
        MonitorSettings {
            interval: Duration::from_secs(3600),
            ..Default::default()
        },
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let cancel = async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_tx.send(true).expect("receiver alive");
    };

    let (summary, ()) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(monitor.run(cancel_rx), cancel)
    })
    .await
    .expect("cancellation should interrupt the hour-long sleep");

    assert_eq!(summary.cycles, 1);
    assert_eq!(monitor.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_non_cancel_update_keeps_full_interval() {
    let source = Scripted::new(vec![snapshot_a()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let interval = Duration::from_millis(300);
    let mut monitor = MonitorLoop::new(
        collector,
        &notifier,
        MonitorSettings {
            interval,
            max_cycles: Some(2),
            ..Default::default()
        },
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let poke = async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel_tx.send(false).expect("receiver alive");
        // Keep the sender alive until the loop finishes.
        cancel_tx
    };

    let started = Instant::now();
    let (summary, _cancel_tx) = tokio::join!(monitor.run(cancel_rx), poke);

    assert_eq!(summary.cycles, 2);
    assert!(
        started.elapsed() >= interval,
        "second cycle started after {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_insufficient_data_does_not_stop_loop() {
    let source = Scripted::new(vec![vec![record(1, 1, 1)], snapshot_a()]);
    let notifier = Recording::default();
    let collector = ProcessCollector::new(&source, FilterCriteria::default());
    let mut monitor = MonitorLoop::new(
        collector,
        &notifier,
        MonitorSettings {
            max_cycles: Some(2),
            ..settings()
        },
    );

    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let summary = monitor.run(cancel_rx).await;

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failed_cycles, 1);
    assert_eq!(summary.alerts, 0);
    assert!(monitor.previous_identity().is_some());
}
