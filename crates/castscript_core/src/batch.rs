//! Batch item state.

use crate::ScriptSections;
use serde::{Deserialize, Serialize};

/// One transcript from an uploaded spreadsheet and its processing state.
///
/// An item is always in exactly one of three states:
/// - pending: not processed, no error
/// - in-error: not processed, error recorded
/// - done: processed, sections recorded, no error
///
/// # Examples
///
/// ```
/// use castscript_core::{BatchResultItem, ScriptSections};
///
/// let mut item = BatchResultItem::pending("transcript text");
/// assert!(item.is_pending());
///
/// item.record_failure("timeout");
/// assert_eq!(item.error(), Some("timeout"));
/// assert!(!item.processed());
///
/// item.record_success(ScriptSections::new("plan", "first", "last"));
/// assert!(item.processed());
/// assert!(item.error().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultItem {
    #[serde(default)]
    transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_sections: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_sections: Option<String>,
    #[serde(default)]
    processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BatchResultItem {
    /// A fresh item waiting to be processed.
    pub fn pending(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            outline: None,
            first_sections: None,
            last_sections: None,
            processed: false,
            error: None,
        }
    }

    /// Store the finished script and mark the item done.
    pub fn record_success(&mut self, sections: ScriptSections) {
        self.outline = Some(sections.outline);
        self.first_sections = Some(sections.first_sections);
        self.last_sections = Some(sections.last_sections);
        self.processed = true;
        self.error = None;
    }

    /// Record why processing failed; the item stays eligible for a rerun.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.processed = false;
        self.error = Some(error.into());
    }

    /// Source transcript.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Generated outline, once done.
    pub fn outline(&self) -> Option<&str> {
        self.outline.as_deref()
    }

    /// First half of the script, once done.
    pub fn first_sections(&self) -> Option<&str> {
        self.first_sections.as_deref()
    }

    /// Second half of the script, once done.
    pub fn last_sections(&self) -> Option<&str> {
        self.last_sections.as_deref()
    }

    /// Whether the item finished successfully.
    pub fn processed(&self) -> bool {
        self.processed
    }

    /// Last failure message, if the item is in error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Neither processed nor failed yet.
    pub fn is_pending(&self) -> bool {
        !self.processed && self.error.is_none()
    }

    /// The finished script, when the item is done.
    pub fn sections(&self) -> Option<ScriptSections> {
        if !self.processed {
            return None;
        }
        match (&self.outline, &self.first_sections, &self.last_sections) {
            (Some(o), Some(f), Some(l)) => Some(ScriptSections::new(o, f, l)),
            _ => None,
        }
    }
}
