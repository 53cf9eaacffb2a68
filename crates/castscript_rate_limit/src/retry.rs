//! Bounded retry with exponential backoff.

use castscript_error::RetryableError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// How many times, and how patiently, to retry a transient failure.
///
/// Whether a failure is transient is decided by the error itself through
/// [`RetryableError`]; permanent errors return immediately.
///
/// ```toml
/// [retry]
/// enabled = true
/// max_retries = 3
/// initial_backoff_ms = 2000
/// max_delay_secs = 30
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct RetryPolicy {
    /// Whether transient failures are retried at all
    #[serde(default = "default_enabled")]
    enabled: bool,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    max_retries: usize,

    /// Delay before the first retry (milliseconds); doubles each retry
    #[serde(default = "default_initial_backoff_ms")]
    initial_backoff_ms: u64,

    /// Upper bound on any single delay (seconds)
    #[serde(default = "default_max_delay_secs")]
    max_delay_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_backoff_ms() -> u64 {
    2000
}

fn default_max_delay_secs() -> u64 {
    30
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl RetryPolicy {
    /// Start building a policy from the defaults.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that makes exactly one attempt.
    pub fn disabled() -> Self {
        Self::default().with_enabled(false)
    }

    /// Delays between attempts, before jitter.
    ///
    /// `ExponentialBackoff` yields `base^n * factor`, so a base of 2 with
    /// half the initial delay as the factor doubles from `initial_backoff_ms`.
    fn schedule(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor((self.initial_backoff_ms / 2).max(1))
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .take(self.max_retries)
    }

    /// Run `operation`, retrying transient failures.
    ///
    /// Returns the first success, the first permanent error, or the last
    /// transient error once the retries are used up.
    ///
    /// # Example
    ///
    /// ```
    /// use castscript_error::{GeminiError, GeminiErrorKind};
    /// use castscript_rate_limit::RetryPolicy;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let policy = RetryPolicy::default().with_initial_backoff_ms(1);
    /// let calls = AtomicUsize::new(0);
    ///
    /// let result = policy
    ///     .execute(|| async {
    ///         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
    ///             Err(GeminiError::new(GeminiErrorKind::EmptyResponse))
    ///         } else {
    ///             Ok("done")
    ///         }
    ///     })
    ///     .await;
    ///
    /// assert_eq!(result.unwrap(), "done");
    /// assert_eq!(calls.load(Ordering::SeqCst), 2);
    /// # }
    /// ```
    pub async fn execute<F, Fut, R, E>(&self, operation: F) -> Result<R, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: RetryableError + std::fmt::Display,
    {
        if !self.enabled {
            return operation().await;
        }

        let attempt = AtomicUsize::new(0);
        let max_attempts = self.max_retries + 1;

        Retry::spawn(self.schedule().map(jitter), || async {
            let current = attempt.fetch_add(1, Ordering::SeqCst) + 1;
            match operation().await {
                Ok(value) => {
                    if current > 1 {
                        debug!(attempt = current, "Succeeded after retry");
                    }
                    Ok(value)
                }
                Err(e) if e.is_retryable() => {
                    warn!(attempt = current, max_attempts, error = %e, "Transient error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(attempt = current, error = %e, "Permanent error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }
}
