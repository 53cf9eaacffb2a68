//! Text generation backends for castscript.
//!
//! The Gemini client sits behind the `gemini` feature (on by default) and
//! implements [`castscript_interface::TextGenerator`]. It applies per-model
//! rate limits from the configured tier and makes exactly one upstream call
//! per request; retrying is left to the caller's `RetryPolicy`.
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use castscript_interface::TextGenerator;
//! use castscript_models::GeminiClient;
//! use castscript_rate_limit::CastscriptConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CastscriptConfig::load()?;
//! let client = GeminiClient::from_config(&config)?;
//! let text = client.generate_text("Summarize this transcript").await?;
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, GeminiResult, TieredGemini};
