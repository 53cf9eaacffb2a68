//! Conversation history for a stateless completion API.
//!
//! The remote model has no memory between calls, so every prompt is sent
//! together with the turns that came before it. This crate keeps those turns
//! per conversation and evicts idle or least recently used conversations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod history;
mod id;

pub use history::{
    ConversationHistory, ConversationStore, HistoryConfig, HistoryConfigBuilder, SharedHistory,
};
pub use id::ConversationId;
