//! Cancellation for pending backoff waits.
//!
//! A [`CancelToken`] is shared between the thread running an auto-reconnecting
//! call and whoever may want to stop it. The reconnect loop checks the token
//! before each wait and while sleeping; once set, the call ends with
//! [`DbError::Cancelled`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::retry::DbError;

/// Longest uninterrupted sleep slice while waiting on a token.
const POLL_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Sleep for `delay`, waking early with `DbError::Cancelled` if the token is set.
pub fn sleep_cancellable(delay: Duration, token: &CancelToken) -> Result<(), DbError> {
    let deadline = Instant::now() + delay;
    loop {
        if token.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        thread::sleep((deadline - now).min(POLL_SLICE));
    }
}
