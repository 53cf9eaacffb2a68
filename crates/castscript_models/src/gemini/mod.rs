//! Google Gemini REST client.
//!
//! - Per-request model selection
//! - Lazily created client per model
//! - Per-model rate limiting from the configured tier

mod client;

pub use client::{GeminiClient, TieredGemini};

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, castscript_error::GeminiError>;
