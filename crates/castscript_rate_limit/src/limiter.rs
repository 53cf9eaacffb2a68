//! Rate limiter built on governor and a Tokio semaphore.
//!
//! Governor's GCRA limiters enforce RPM, TPM and RPD; the semaphore enforces
//! the concurrent request limit.

use crate::Tier;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Rate limiter that owns a value implementing [`Tier`].
///
/// The wrapped value (typically an SDK client paired with its tier) is
/// reachable through [`RateLimiter::inner`]; callers acquire a guard before
/// using it.
///
/// # Example
///
/// ```
/// use castscript_rate_limit::{RateLimiter, TierConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = RateLimiter::new(TierConfig::unlimited());
/// let guard = limiter.acquire(1000).await;
/// assert_eq!(limiter.inner().name, "Unlimited");
/// drop(guard);
/// # }
/// ```
#[derive(Clone)]
pub struct RateLimiter<T: Tier> {
    inner: T,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    tpm_limiter: Option<Arc<DirectRateLimiter>>,
    rpd_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
}

impl<T: Tier> RateLimiter<T> {
    /// Create a limiter enforcing every limit the tier sets.
    pub fn new(tier: T) -> Self {
        let rpm_limiter = tier.rpm().and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        // Governor counts in u32; larger TPM values saturate.
        let tpm_limiter = tier.tpm().and_then(|tpm| {
            NonZeroU32::new(tpm.min(u32::MAX as u64) as u32)
                .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        // The whole daily allowance as one burst, refilled over 24 hours.
        let rpd_limiter = tier.rpd().and_then(|rpd| {
            let n = NonZeroU32::new(rpd)?;
            Quota::with_period(DAY / n.get())
                .map(|quota| Arc::new(GovernorRateLimiter::direct(quota.allow_burst(n))))
        });

        let max_concurrent = tier
            .max_concurrent()
            .map(|n| n as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);
        let concurrent_semaphore = Arc::new(Semaphore::new(max_concurrent));

        debug!(
            tier = tier.name(),
            rpm = ?tier.rpm(),
            tpm = ?tier.tpm(),
            rpd = ?tier.rpd(),
            max_concurrent = ?tier.max_concurrent(),
            "Created rate limiter"
        );

        Self {
            inner: tier,
            rpm_limiter,
            tpm_limiter,
            rpd_limiter,
            concurrent_semaphore,
        }
    }

    /// The wrapped value.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Wait until every limit allows one more request.
    ///
    /// `estimated_tokens` feeds the TPM limiter. The concurrent slot is taken
    /// last so it is not held while waiting on the other quotas; it is
    /// released when the guard drops.
    pub async fn acquire(&self, estimated_tokens: u64) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        if let Some(limiter) = &self.tpm_limiter {
            let tokens = (estimated_tokens.min(u32::MAX as u64) as u32).max(1);
            match NonZeroU32::new(tokens) {
                Some(n) if limiter.until_n_ready(n).await.is_ok() => {}
                // Requests larger than the whole burst only wait for one cell.
                _ => limiter.until_ready().await,
            }
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.until_ready().await;
        }

        let permit = self.concurrent_semaphore.clone().acquire_owned().await.ok();

        RateLimiterGuard { _permit: permit }
    }

    /// Acquire without waiting; `None` if any limit would block.
    ///
    /// Counts as one token against the TPM limit.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        if let Some(limiter) = &self.tpm_limiter {
            limiter.check().ok()?;
        }

        if let Some(limiter) = &self.rpd_limiter {
            limiter.check().ok()?;
        }

        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;

        Some(RateLimiterGuard {
            _permit: Some(permit),
        })
    }

    /// Slots currently free under the concurrent request limit.
    pub fn available_slots(&self) -> usize {
        self.concurrent_semaphore.available_permits()
    }
}

/// RAII guard that returns the concurrent request slot when dropped.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
