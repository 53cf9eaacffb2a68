//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
///
/// # Examples
///
/// ```
/// use castscript_core::Role;
///
/// assert_eq!(format!("{}", Role::User), "User");
/// assert_eq!(Role::Assistant.prompt_label(), "AI");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Prompts sent by the pipeline
    User,
    /// Completions returned by the model
    Assistant,
}

impl Role {
    /// Label used when replaying history inside a prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "AI",
        }
    }
}
