//! Pipeline output types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A finished script: the plan it was written from and its two halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSections {
    pub(crate) outline: String,
    pub(crate) first_sections: String,
    pub(crate) last_sections: String,
}

impl ScriptSections {
    /// Bundle the three parts of a finished script.
    pub fn new(
        outline: impl Into<String>,
        first_sections: impl Into<String>,
        last_sections: impl Into<String>,
    ) -> Self {
        Self {
            outline: outline.into(),
            first_sections: first_sections.into(),
            last_sections: last_sections.into(),
        }
    }

    /// The script body: first half, blank line, last half.
    pub fn body(&self) -> String {
        format!("{}\n\n{}", self.first_sections, self.last_sections)
    }
}

/// Outcome of processing one transcript.
///
/// Either a success carrying all three sections, or a failure carrying only
/// the error message. The two constructors are the only way to build one.
///
/// # Examples
///
/// ```
/// use castscript_core::{ProcessingResult, ScriptSections};
///
/// let ok = ProcessingResult::succeeded(ScriptSections::new("plan", "intro", "outro"));
/// assert!(ok.success());
/// assert!(ok.error().is_none());
///
/// let failed = ProcessingResult::failed("upstream unavailable");
/// assert!(!failed.success());
/// assert!(failed.outline().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_sections: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_sections: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProcessingResult {
    /// A successful run.
    pub fn succeeded(sections: ScriptSections) -> Self {
        Self {
            success: true,
            outline: Some(sections.outline),
            first_sections: Some(sections.first_sections),
            last_sections: Some(sections.last_sections),
            error: None,
        }
    }

    /// A failed run.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            outline: None,
            first_sections: None,
            last_sections: None,
            error: Some(error.into()),
        }
    }

    /// Whether the run succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    /// The plan the script was written from.
    pub fn outline(&self) -> Option<&str> {
        self.outline.as_deref()
    }

    /// First half of the script.
    pub fn first_sections(&self) -> Option<&str> {
        self.first_sections.as_deref()
    }

    /// Second half of the script.
    pub fn last_sections(&self) -> Option<&str> {
        self.last_sections.as_deref()
    }

    /// Failure message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Convert into the sections on success or the message on failure.
    pub fn into_sections(self) -> Result<ScriptSections, String> {
        match (self.outline, self.first_sections, self.last_sections) {
            (Some(outline), Some(first), Some(last)) if self.success => {
                Ok(ScriptSections::new(outline, first, last))
            }
            _ => Err(self
                .error
                .unwrap_or_else(|| "Processing failed without an error message".to_string())),
        }
    }
}
