//! Alert delivery for best-pair changes.
//!
//! Delivery failures are returned to the caller, which logs them and keeps
//! the monitor loop running.

use serde::Serialize;
use tracing::warn;

use crate::error::NotificationError;
use crate::pair::BestPairResult;

/// Payload emitted when the best pair changes between cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEvent {
    pub score: u64,
    pub first: String,
    pub second: String,
}

impl AlertEvent {
    pub fn from_result(result: &BestPairResult) -> Self {
        Self {
            score: result.score,
            first: result.first.summary(),
            second: result.second.summary(),
        }
    }

    pub fn title(&self) -> String {
        format!("Best process pair changed (score {})", self.score)
    }

    pub fn body(&self) -> String {
        format!("{}\n{}", self.first, self.second)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotificationError>;
}

/// Writes alerts to the tracing log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotificationError> {
        warn!(
            score = event.score,
            first = %event.first,
            second = %event.second,
            "Best pair changed"
        );
        Ok(())
    }
}

/// Sends alerts to every inner notifier. Fails if any of them failed,
/// after attempting all of them.
#[derive(Default)]
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for CompositeNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotificationError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(event) {
                warn!("Notifier failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DesktopNotifier;

#[cfg(feature = "desktop")]
mod desktop {
    use notify_rust::{Notification, Timeout};

    use super::{AlertEvent, Notifier};
    use crate::error::NotificationError;

    /// Desktop notification through the session notification daemon.
    pub struct DesktopNotifier;

    impl Notifier for DesktopNotifier {
        fn notify(&self, event: &AlertEvent) -> Result<(), NotificationError> {
            Notification::new()
                .summary(&event.title())
                .body(&event.body())
                .appname("procpair")
                .timeout(Timeout::Milliseconds(10_000))
                .show()
                .map_err(|e| NotificationError::ChannelUnavailable(e.to_string()))?;
            Ok(())
        }
    }
}
