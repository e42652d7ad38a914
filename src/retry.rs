//! Retry with exponential backoff for transient E-utilities failures

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

/// Errors that know whether repeating the request could succeed
pub trait RetryableError {
    /// Whether the failure is transient
    fn is_retryable(&self) -> bool;

    /// Short human readable reason, used in log events
    fn retry_reason(&self) -> &str;
}

/// Backoff policy applied to every outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Randomize delays to avoid synchronized retries
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            use_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create the default retry policy (3 retries starting at 500ms)
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Delays between attempts, doubling from `initial_delay`
    pub fn delays(&self) -> Vec<Duration> {
        // ExponentialBackoff yields base^n * factor; base 2 with factor
        // initial/2 starts the sequence at `initial_delay`
        let factor = (self.initial_delay.as_millis() as u64 / 2).max(1);
        let backoff = ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .take(self.max_retries);

        if self.use_jitter {
            backoff.map(jitter).collect()
        } else {
            backoff.collect()
        }
    }
}

/// Run `operation`, retrying transient failures according to `config`
///
/// Non-retryable errors are returned immediately.
pub async fn with_retry<F, Fut, T, E>(operation: F, config: &RetryConfig, context: &str) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    let mut attempt = 0usize;
    let max_retries = config.max_retries;

    RetryIf::spawn(config.delays(), operation, |err: &E| {
        attempt += 1;
        if err.is_retryable() && attempt <= max_retries {
            warn!(
                context = context,
                attempt = attempt,
                max_retries = max_retries,
                reason = err.retry_reason(),
                error = %err,
                "Transient failure, retrying"
            );
            true
        } else {
            debug!(context = context, reason = err.retry_reason(), "Not retrying");
            false
        }
    })
    .await
}
