//! Core data types for castscript.
//!
//! These types are shared by the pipeline, the batch runner, the exporters
//! and the HTTP boundary. Serialized field names follow the JSON the web
//! front end exchanges (`firstSections`, `lastSections`, ...).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod message;
mod request;
mod result;
mod role;

pub use batch::BatchResultItem;
pub use message::ConversationMessage;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use result::{ProcessingResult, ScriptSections};
pub use role::Role;
