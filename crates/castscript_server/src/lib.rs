//! HTTP boundary for castscript.
//!
//! Serves the generation proxy and document endpoints the web front end
//! calls, plus routes that run the pipeline and batch exports server-side.
//! See [`router`] for the route table.
//!
//! [`GatewayClient`] is the other side of `/api/gemini`: a [`TextGenerator`]
//! that forwards prompts to a remote castscript server.
//!
//! # Example
//!
//! ```rust,no_run
//! use castscript_cache::{ConversationStore, HistoryConfig};
//! use castscript_narrative::PipelineConfig;
//! use castscript_rate_limit::RetryPolicy;
//! use castscript_server::{AppState, GatewayClient, ServerConfig, serve};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = Arc::new(GatewayClient::new("http://upstream:3000")?);
//!     let state = AppState::new(
//!         generator,
//!         ConversationStore::shared(HistoryConfig::default()),
//!         RetryPolicy::default(),
//!         PipelineConfig::default(),
//!     )?;
//!     serve(state, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! [`TextGenerator`]: castscript_interface::TextGenerator

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gateway;
mod routes;
mod serve;
mod state;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ApiError;
pub use gateway::GatewayClient;
pub use routes::{
    DOCX_FAILURE, DataBody, GEMINI_FAILURE, ItemsBody, ProcessBody, PromptBody, PromptReply,
    router,
};
pub use serve::serve;
pub use state::AppState;
