//! Script profiles: the prompts and part plan a pipeline run follows.
//!
//! A profile is plain TOML. Preamble steps run in order and store each
//! response under their `key`; the part plan then decides how many parts to
//! write and which template writes them. Two profiles ship with the crate:
//!
//! - `actor_brief` (default): outline, learn a brief, per-actor outline, ask
//!   for the part count, then write the parts.
//! - `national_subject`: one outline, then eight fixed parts that each see
//!   every earlier part.
//!
//! ```toml
//! name = "short"
//! conversation_tag = "short"
//! outline_key = "outline"
//!
//! [[steps]]
//! stage = "outline_draft"
//! key = "outline"
//! template = "{{transcript}}\n\nOutline this."
//!
//! [parts]
//! template = "Write part {{part_number}} of {{total_parts}} for:\n\n{{outline}}"
//!
//! [parts.count]
//! mode = "fixed"
//! count = 2
//! ```

use crate::template::placeholders;
use castscript_error::{CastscriptResult, PipelineError, PipelineErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in profiles, bundled at compile time.
const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("actor_brief", include_str!("profiles/actor_brief.toml")),
    ("national_subject", include_str!("profiles/national_subject.toml")),
];

/// Placeholder holding the source transcript.
pub const TRANSCRIPT: &str = "transcript";
/// Placeholder holding the number of parts being written.
pub const TOTAL_PARTS: &str = "total_parts";
/// Placeholder holding the 1-based number of the part being written.
pub const PART_NUMBER: &str = "part_number";
/// Placeholder holding every part written so far, blank-line separated.
pub const PREVIOUS_PARTS: &str = "previous_parts";

const RESERVED: &[&str] = &[TRANSCRIPT, TOTAL_PARTS, PART_NUMBER, PREVIOUS_PARTS];

/// Stage a preamble step reports when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum PreambleStage {
    /// First outline drawn from the transcript
    #[display("outline draft")]
    OutlineDraft,
    /// Style brief submitted for the model to internalize
    #[display("brief applied")]
    BriefApplied,
    /// Outline reworked into one section per subject
    #[display("character outline")]
    CharacterOutline,
}

/// One prompt sent before any parts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PromptStep {
    /// Stage reported while this step runs
    stage: PreambleStage,
    /// Name the response is stored under for later templates
    key: String,
    /// Prompt template
    template: String,
    /// Whether the exchange is recorded in conversation history
    #[serde(default = "default_true")]
    persist: bool,
}

/// How many parts a run writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PartCount {
    /// Ask the model; its reply is parsed as an integer
    Counted {
        /// Prompt asking for the count
        template: String,
    },
    /// Always write this many parts
    Fixed {
        /// Number of parts
        count: u32,
    },
}

/// The part-writing phase of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PartPlan {
    /// Where the number of parts comes from
    count: PartCount,
    /// Template for part 1 when it differs; part 1 is always persisted
    #[serde(default)]
    first_template: Option<String>,
    /// Template for every other part
    template: String,
    /// Whether parts written with `template` are recorded in history
    #[serde(default = "default_true")]
    persist_history: bool,
}

fn default_true() -> bool {
    true
}

/// A named set of prompt templates and a part plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScriptProfile {
    /// Profile name
    name: String,
    /// Human-readable summary
    #[serde(default)]
    description: String,
    /// Tag that prefixes conversation ids created for this profile
    conversation_tag: String,
    /// Step key whose response is returned as the outline
    outline_key: String,
    /// Prompts sent before part writing, in order
    #[serde(default)]
    steps: Vec<PromptStep>,
    /// Part-writing phase
    parts: PartPlan,
}

impl ScriptProfile {
    /// Names of the bundled profiles.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_PROFILES.iter().map(|(name, _)| *name)
    }

    /// Load a bundled profile by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use castscript_narrative::ScriptProfile;
    ///
    /// let profile = ScriptProfile::builtin("national_subject").unwrap();
    /// assert_eq!(profile.conversation_tag(), "vietnamese_actor");
    /// assert!(ScriptProfile::builtin("nope").is_err());
    /// ```
    pub fn builtin(name: &str) -> CastscriptResult<Self> {
        let (_, source) = BUILTIN_PROFILES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| PipelineError::new(PipelineErrorKind::UnknownProfile(name.to_string())))?;
        Self::from_toml_str(source)
    }

    /// Load a profile file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CastscriptResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::new(PipelineErrorKind::ProfileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let profile = Self::from_toml_str(&source)?;
        tracing::debug!(profile = %profile.name, "Loaded profile from file");
        Ok(profile)
    }

    /// Parse and validate a profile from TOML text.
    pub fn from_toml_str(source: &str) -> CastscriptResult<Self> {
        let profile: Self = toml::from_str(source)
            .map_err(|e| PipelineError::new(PipelineErrorKind::ProfileParse(e.to_string())))?;
        profile.validate()?;
        Ok(profile)
    }

    /// A bundled profile name, or else a path to a profile file.
    pub fn resolve(name_or_path: &str) -> CastscriptResult<Self> {
        if Self::builtin_names().any(|name| name == name_or_path) {
            return Self::builtin(name_or_path);
        }
        let path = Path::new(name_or_path);
        if path.is_file() {
            return Self::from_file(path);
        }
        Err(PipelineError::new(PipelineErrorKind::UnknownProfile(name_or_path.to_string())).into())
    }

    /// Check that every template only references values available when it runs.
    fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |reason: String| {
            PipelineError::new(PipelineErrorKind::InvalidProfile {
                profile: self.name.clone(),
                reason,
            })
        };

        let mut available: Vec<&str> = vec![TRANSCRIPT];
        for step in &self.steps {
            if RESERVED.contains(&step.key.as_str()) {
                return Err(invalid(format!("step key '{}' is reserved", step.key)));
            }
            if available.contains(&step.key.as_str()) {
                return Err(invalid(format!("step key '{}' is used twice", step.key)));
            }
            check_template(&step.template, &available).map_err(&invalid)?;
            available.push(&step.key);
        }

        if !self.steps.iter().any(|s| s.key == self.outline_key) {
            return Err(invalid(format!(
                "outline_key '{}' does not name a step",
                self.outline_key
            )));
        }

        match &self.parts.count {
            PartCount::Counted { template } => {
                check_template(template, &available).map_err(&invalid)?;
            }
            PartCount::Fixed { count: 0 } => {
                return Err(invalid("fixed part count must be at least 1".to_string()));
            }
            PartCount::Fixed { .. } => {}
        }

        available.extend([TOTAL_PARTS, PART_NUMBER, PREVIOUS_PARTS]);
        if let Some(first) = &self.parts.first_template {
            check_template(first, &available).map_err(&invalid)?;
        }
        check_template(&self.parts.template, &available).map_err(&invalid)?;

        Ok(())
    }
}

fn check_template(template: &str, available: &[&str]) -> Result<(), String> {
    let names = placeholders(template).map_err(|e| e.kind.to_string())?;
    match names.iter().find(|name| !available.contains(&name.as_str())) {
        Some(unknown) => Err(format!(
            "template references '{}' which is not available (have: {})",
            unknown,
            available.join(", ")
        )),
        None => Ok(()),
    }
}
