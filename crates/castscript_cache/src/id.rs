//! Conversation identifiers.

use serde::{Deserialize, Serialize};

/// Opaque key grouping the turns of one pipeline run.
///
/// Generated ids combine a purpose tag, the creation time in milliseconds and
/// a short random suffix, e.g. `transcript_1718000000000_1a2b3c4d`.
///
/// # Examples
///
/// ```
/// use castscript_cache::ConversationId;
///
/// let a = ConversationId::generate("transcript");
/// let b = ConversationId::generate("transcript");
/// assert!(a.as_str().starts_with("transcript_"));
/// assert_ne!(a, b);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Use an existing id verbatim.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh id for a purpose tag.
    pub fn generate(tag: &str) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{}_{}_{}", tag, millis, &suffix[..8]))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
