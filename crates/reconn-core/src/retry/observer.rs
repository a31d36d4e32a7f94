//! Observation hooks for reconnect attempts.
//!
//! The coordinator reports every backoff, reconnect failure and success to a
//! [`RetryObserver`]. The default observer logs through `tracing`; tests use
//! [`RecordingObserver`] to assert on attempts without capturing output.

use std::sync::Mutex;
use std::time::Duration;

/// One step of the reconnect loop. Errors are rendered to strings so events can
/// be stored after the original error has been handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryEvent {
    /// About to wait `delay`, then reconnect. `attempt` is 0-based.
    Reconnecting {
        attempt: u32,
        delay: Duration,
        error: String,
    },
    /// The reconnect for `attempt` failed.
    ReconnectFailed { attempt: u32, error: String },
    /// The reconnect for `attempt` succeeded.
    Reconnected { attempt: u32 },
    /// Budget spent while the error is still network-class.
    Exhausted { attempts: u32, error: String },
}

pub trait RetryObserver: Send + Sync {
    fn on_event(&self, event: &RetryEvent);
}

/// Logs reconnect activity. Operator-visible lines only when `debug` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    pub debug: bool,
}

impl TracingObserver {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl RetryObserver for TracingObserver {
    fn on_event(&self, event: &RetryEvent) {
        if !self.debug {
            tracing::trace!(?event, "reconnect event");
            return;
        }
        match event {
            RetryEvent::Reconnecting {
                attempt,
                delay,
                error,
            } => {
                tracing::warn!(attempt, ?delay, "Error: '{}' - reconnecting...", error);
            }
            RetryEvent::ReconnectFailed { attempt, error } => {
                tracing::warn!(attempt, "Can't reconnect: {}", error);
            }
            RetryEvent::Reconnected { attempt } => {
                tracing::info!(attempt, "reconnected");
            }
            RetryEvent::Exhausted { attempts, error } => {
                tracing::error!(attempts, "giving up after {} reconnects: {}", attempts, error);
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RetryEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RetryEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of reconnects issued (successful or not).
    pub fn reconnect_attempts(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    RetryEvent::Reconnected { .. } | RetryEvent::ReconnectFailed { .. }
                )
            })
            .count()
    }

    /// Backoff delays in the order they were applied.
    pub fn delays(&self) -> Vec<Duration> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                RetryEvent::Reconnecting { delay, .. } => Some(*delay),
                _ => None,
            })
            .collect()
    }
}

impl RetryObserver for RecordingObserver {
    fn on_event(&self, event: &RetryEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
