//! Message types for conversation history.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One turn of a conversation.
///
/// # Examples
///
/// ```
/// use castscript_core::{ConversationMessage, Role};
///
/// let message = ConversationMessage::user("Hello!");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.render(), "User: Hello!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender
    pub role: Role,
    /// The text of the turn
    pub content: String,
}

impl ConversationMessage {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Render as a `"{role}: {content}"` history line.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.prompt_label(), self.content)
    }
}
