//! Castscript - transcript to narration script
//!
//! Castscript turns the transcript of a video into a long-form narration
//! script. A profile of prompt templates drives a multi-turn conversation
//! with Gemini: draft an outline, learn a style brief, plan the parts, then
//! write them one by one. The finished script is split into two halves and
//! can be exported as text, Word or Excel.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use castscript::{GeminiClient, Settings, ScriptPipeline, ScriptProfile, ConversationStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(None)?;
//!     let client = Arc::new(GeminiClient::from_config(settings.upstream())?);
//!
//!     let pipeline = ScriptPipeline::new(
//!         client,
//!         ConversationStore::shared(settings.history().clone()),
//!         settings.upstream().retry.clone(),
//!         settings.pipeline().clone(),
//!         ScriptProfile::resolve(settings.pipeline().profile())?,
//!     );
//!
//!     let result = pipeline.process("Transcript text...").await;
//!     println!("{:?}", result.first_sections());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry stdout span exporter
//!
//! # Architecture
//!
//! - `castscript_error` - Error types
//! - `castscript_core` - Requests, results and batch items
//! - `castscript_interface` - `TextGenerator` trait
//! - `castscript_rate_limit` - Configuration, rate limiting and retry
//! - `castscript_cache` - Conversation history store
//! - `castscript_models` - Gemini backend
//! - `castscript_narrative` - Profiles, pipeline and batch runner
//! - `castscript_export` - Text, Word and Excel formats
//! - `castscript_server` - HTTP routes and gateway client
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod generator;
mod observability;
mod settings;

pub use generator::build_generator;
pub use observability::{ObservabilityConfig, init_observability, shutdown_observability};
pub use settings::Settings;

pub use castscript_cache::*;
pub use castscript_core::*;
pub use castscript_error::*;
pub use castscript_export::*;
pub use castscript_interface::*;
pub use castscript_models::{GeminiClient, TieredGemini};
pub use castscript_narrative::{
    BatchObserver, BatchRunner, FnBatchObserver, NoopBatchObserver, PipelineConfig,
    PipelineConfigBuilder, PipelineStage, ScriptPipeline, ScriptProfile, StageObserver,
};
pub use castscript_rate_limit::*;
pub use castscript_server::{AppState, GatewayClient, ServerConfig, router, serve};
