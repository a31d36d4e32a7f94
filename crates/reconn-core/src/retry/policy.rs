use std::time::Duration;

/// Wait inserted before a reconnect attempt.
///
/// `counter` is the number of reconnects already made in the current logical
/// call, so the first reconnect of a call is immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `unit * counter`.
    Linear { unit: Duration },
    /// `0` for counter 0, then `base * 2^(counter-1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Linear {
            unit: Duration::from_secs(1),
        }
    }
}

impl Backoff {
    /// Delay before the reconnect made when `counter` reconnects already happened.
    pub fn delay(&self, counter: u32) -> Duration {
        match *self {
            Backoff::Linear { unit } => unit.saturating_mul(counter),
            Backoff::Exponential { base, max } => {
                if counter == 0 {
                    return Duration::ZERO;
                }
                let exp = 1u32 << (counter - 1).min(16);
                base.saturating_mul(exp).min(max)
            }
        }
    }
}

/// Reconnect attempts made in one logical call, against the connection's limit.
///
/// A call may make up to `max_retries + 1` reconnects: attempts `0..=max_retries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    attempts: u32,
    max_retries: u32,
}

impl RetryBudget {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempts: 0,
            max_retries,
        }
    }

    /// Reconnects made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn has_remaining(&self) -> bool {
        self.attempts <= self.max_retries
    }

    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }
}
