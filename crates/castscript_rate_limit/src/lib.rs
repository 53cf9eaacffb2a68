//! Configuration, rate limiting and bounded retry.
//!
//! - [`CastscriptConfig`] layers the bundled `castscript.toml` with user
//!   overrides from the home and working directories.
//! - [`RateLimiter`] enforces per-tier request quotas before each upstream call.
//! - [`RetryPolicy`] retries transient failures with capped exponential
//!   backoff, deciding by error kind through `RetryableError`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod retry;
mod tier;

pub use config::{
    CastscriptConfig, GeminiConfig, ModelTierConfig, ProviderConfig, TierConfig, layered_sources,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use retry::{RetryPolicy, RetryPolicyBuilder};
pub use tier::Tier;
