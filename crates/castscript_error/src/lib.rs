//! Error types for castscript.
//!
//! Every error area follows the same shape:
//! - a `*ErrorKind` enum naming the specific condition
//! - a `*Error` struct wrapping the kind together with the source location
//!   captured through `#[track_caller]`
//!
//! All of them convert into [`CastscriptError`], so `?` works across crates.
//!
//! # Examples
//!
//! ```
//! use castscript_error::{CastscriptResult, ValidationError, ValidationErrorKind};
//!
//! fn check_prompt(prompt: &str) -> CastscriptResult<()> {
//!     if prompt.trim().is_empty() {
//!         Err(ValidationError::new(ValidationErrorKind::MissingPrompt))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_prompt("").is_err());
//! assert!(check_prompt("hello").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod export;
mod gemini;
mod http;
mod json;
mod pipeline;
mod server;
mod validation;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{CastscriptError, CastscriptErrorKind, CastscriptResult};
pub use export::{ExportError, ExportErrorKind};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use http::HttpError;
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
