//! Transcript-to-script pipeline.

use crate::conversation::{Conversation, lock_history};
use crate::profile::{PART_NUMBER, PREVIOUS_PARTS, PartCount, ScriptProfile, TOTAL_PARTS, TRANSCRIPT};
use crate::split::{CHUNK_SEPARATOR, MidpointSplitter, SectionSplitter};
use crate::template::{TemplateContext, render_template};
use crate::PreambleStage;
use castscript_cache::{ConversationId, SharedHistory};
use castscript_core::{ProcessingResult, ScriptSections};
use castscript_error::{CastscriptResult, PipelineError, PipelineErrorKind};
use castscript_interface::TextGenerator;
use castscript_rate_limit::RetryPolicy;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Progress marker reported while a transcript is processed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PipelineStage {
    /// Drawing the first outline from the transcript
    #[display("outline draft")]
    OutlineDraft,
    /// Submitting the style brief
    #[display("brief applied")]
    BriefApplied,
    /// Reworking the outline per subject
    #[display("character outline")]
    CharacterOutline,
    /// Asking how many parts to write
    #[display("part count")]
    PartCount,
    /// Writing one part
    #[display("part {} of {}", number, total)]
    Part {
        /// 1-based part number
        number: u32,
        /// Parts in this run
        total: u32,
    },
    /// Dividing the finished text into two sections
    #[display("split")]
    Split,
    /// Finished successfully
    #[display("done")]
    Done,
    /// Aborted with this message
    #[display("failed: {}", _0)]
    Failed(String),
}

impl From<PreambleStage> for PipelineStage {
    fn from(stage: PreambleStage) -> Self {
        match stage {
            PreambleStage::OutlineDraft => Self::OutlineDraft,
            PreambleStage::BriefApplied => Self::BriefApplied,
            PreambleStage::CharacterOutline => Self::CharacterOutline,
        }
    }
}

/// Receives stage transitions from a pipeline run.
///
/// Closures taking `&PipelineStage` implement this directly.
pub trait StageObserver: Send + Sync {
    /// Called when the run enters `stage`.
    fn on_stage(&self, stage: &PipelineStage);
}

impl<F> StageObserver for F
where
    F: Fn(&PipelineStage) + Send + Sync,
{
    fn on_stage(&self, stage: &PipelineStage) {
        self(stage)
    }
}

/// Observer that ignores every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStageObserver;

impl StageObserver for NoopStageObserver {
    fn on_stage(&self, _stage: &PipelineStage) {}
}

/// Pipeline tuning shared by single runs and batches.
///
/// ```toml
/// [pipeline]
/// profile = "actor_brief"
/// part_delay_ms = 1200
/// batch_delay_ms = 1000
/// max_parts = 40
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct PipelineConfig {
    /// Profile used when a request names none: a bundled name or a file path
    #[serde(default = "default_profile")]
    profile: String,

    /// Pause between part requests (milliseconds)
    #[serde(default = "default_part_delay_ms")]
    part_delay_ms: u64,

    /// Pause between batch items (milliseconds)
    #[serde(default = "default_batch_delay_ms")]
    batch_delay_ms: u64,

    /// Largest part count accepted from the model
    #[serde(default = "default_max_parts")]
    max_parts: u32,
}

fn default_profile() -> String {
    "actor_brief".to_string()
}

fn default_part_delay_ms() -> u64 {
    1200
}

fn default_batch_delay_ms() -> u64 {
    1000
}

fn default_max_parts() -> u32 {
    40
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            part_delay_ms: default_part_delay_ms(),
            batch_delay_ms: default_batch_delay_ms(),
            max_parts: default_max_parts(),
        }
    }
}

impl PipelineConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Parse the model's answer to "how many parts?".
///
/// Reads like JavaScript `parseInt`: surrounding whitespace is ignored, an
/// optional `+` is accepted, and leading digits are taken up to the first
/// non-digit.
///
/// # Errors
///
/// - `UnusablePartCount` when there are no leading digits or the count is 0
/// - `TooManyParts` when the count exceeds `max_parts`
///
/// # Examples
///
/// ```
/// use castscript_narrative::parse_part_count;
///
/// assert_eq!(parse_part_count(" 12\n", 40).unwrap(), 12);
/// assert_eq!(parse_part_count("7 parts", 40).unwrap(), 7);
/// assert!(parse_part_count("twelve", 40).is_err());
/// assert!(parse_part_count("0", 40).is_err());
/// assert!(parse_part_count("41", 40).is_err());
/// ```
pub fn parse_part_count(response: &str, max_parts: u32) -> Result<u32, PipelineError> {
    let trimmed = response.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    let unusable = || PipelineError::new(PipelineErrorKind::UnusablePartCount(trimmed.to_string()));

    if digits.is_empty() {
        return Err(unusable());
    }

    // Longer than u32 can hold is certainly over the limit
    let count = digits.parse::<u32>().unwrap_or(u32::MAX);
    if count == 0 {
        return Err(unusable());
    }
    if count > max_parts {
        return Err(PipelineError::new(PipelineErrorKind::TooManyParts {
            count,
            max: max_parts,
        }));
    }
    Ok(count)
}

/// Runs one transcript through a [`ScriptProfile`].
///
/// Each run uses a fresh conversation id tagged by the profile. Calls are
/// made one after another; every call passes through the retry policy. The
/// run's history is cleared when it finishes.
///
/// # Example
///
/// ```no_run
/// use castscript_cache::{ConversationStore, HistoryConfig};
/// use castscript_models::GeminiClient;
/// use castscript_narrative::{PipelineConfig, ScriptPipeline, ScriptProfile};
/// use castscript_rate_limit::{CastscriptConfig, RetryPolicy};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CastscriptConfig::load()?;
/// let pipeline = ScriptPipeline::new(
///     Arc::new(GeminiClient::from_config(&config)?),
///     ConversationStore::shared(HistoryConfig::default()),
///     config.retry.clone(),
///     PipelineConfig::default(),
///     ScriptProfile::builtin("actor_brief")?,
/// );
///
/// let result = pipeline.process("transcript text...").await;
/// println!("{}", result.outline().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct ScriptPipeline<G: TextGenerator + ?Sized> {
    generator: Arc<G>,
    history: SharedHistory,
    retry: RetryPolicy,
    config: PipelineConfig,
    profile: ScriptProfile,
    splitter: Arc<dyn SectionSplitter>,
}

impl<G: TextGenerator + ?Sized> Clone for ScriptPipeline<G> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            history: Arc::clone(&self.history),
            retry: self.retry.clone(),
            config: self.config.clone(),
            profile: self.profile.clone(),
            splitter: Arc::clone(&self.splitter),
        }
    }
}

impl<G: TextGenerator + ?Sized> ScriptPipeline<G> {
    /// Create a pipeline that splits with [`MidpointSplitter`].
    pub fn new(
        generator: Arc<G>,
        history: SharedHistory,
        retry: RetryPolicy,
        config: PipelineConfig,
        profile: ScriptProfile,
    ) -> Self {
        Self {
            generator,
            history,
            retry,
            config,
            profile,
            splitter: Arc::new(MidpointSplitter),
        }
    }

    /// Replace the section splitter.
    pub fn with_splitter(mut self, splitter: Arc<dyn SectionSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// The profile this pipeline follows.
    pub fn profile(&self) -> &ScriptProfile {
        &self.profile
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a transcript without stage reporting.
    pub async fn process(&self, transcript: &str) -> ProcessingResult {
        self.process_with(transcript, &NoopStageObserver).await
    }

    /// Process a transcript, reporting stages to `observer`.
    ///
    /// Never fails: errors become a failed [`ProcessingResult`] and any
    /// partially generated parts are discarded.
    pub async fn process_with(
        &self,
        transcript: &str,
        observer: &dyn StageObserver,
    ) -> ProcessingResult {
        match self.run(transcript, observer).await {
            Ok(sections) => ProcessingResult::succeeded(sections),
            Err(e) => {
                let message = e.user_message();
                warn!(profile = %self.profile.name(), error = %e, "Pipeline failed");
                observer.on_stage(&PipelineStage::Failed(message.clone()));
                ProcessingResult::failed(message)
            }
        }
    }

    /// Process a transcript, returning the sections or the first error.
    #[instrument(
        skip(self, transcript, observer),
        fields(profile = %self.profile.name(), transcript_len = transcript.len())
    )]
    pub async fn run(
        &self,
        transcript: &str,
        observer: &dyn StageObserver,
    ) -> CastscriptResult<ScriptSections> {
        let id = ConversationId::generate(self.profile.conversation_tag());
        let conversation = Conversation::new(
            id.clone(),
            &*self.generator,
            Arc::clone(&self.history),
            &self.retry,
        );
        info!(conversation = %id, "Starting pipeline run");

        let result = self.run_steps(&conversation, transcript, observer).await;
        lock_history(&self.history).clear(&id);
        result
    }

    async fn run_steps(
        &self,
        conversation: &Conversation<'_, G>,
        transcript: &str,
        observer: &dyn StageObserver,
    ) -> CastscriptResult<ScriptSections> {
        let mut context = TemplateContext::new();
        context.insert(TRANSCRIPT, transcript);

        for step in self.profile.steps() {
            let stage = PipelineStage::from(*step.stage());
            self.enter(observer, &stage);

            let prompt = render_template(step.template(), &context)?;
            let reply = conversation.send(&prompt, *step.persist()).await?;
            context.insert(step.key().as_str(), reply);
        }

        let plan = self.profile.parts();
        let total = match plan.count() {
            PartCount::Counted { template } => {
                self.enter(observer, &PipelineStage::PartCount);
                let prompt = render_template(template, &context)?;
                let reply = conversation.send(&prompt, true).await?;
                parse_part_count(&reply, self.config.max_parts)?
            }
            PartCount::Fixed { count } if *count > self.config.max_parts => {
                return Err(PipelineError::new(PipelineErrorKind::TooManyParts {
                    count: *count,
                    max: self.config.max_parts,
                })
                .into());
            }
            PartCount::Fixed { count } => *count,
        };
        info!(total_parts = total, "Writing parts");
        context.insert(TOTAL_PARTS, total.to_string());

        let mut parts: Vec<String> = Vec::with_capacity(total as usize);
        for number in 1..=total {
            self.enter(observer, &PipelineStage::Part { number, total });

            context.insert(PART_NUMBER, number.to_string());
            context.insert(PREVIOUS_PARTS, parts.join(CHUNK_SEPARATOR));

            let (template, persist) = match plan.first_template() {
                Some(first) if number == 1 => (first, true),
                _ => (plan.template(), *plan.persist_history()),
            };
            let prompt = render_template(template, &context)?;
            parts.push(conversation.send(&prompt, persist).await?);

            if number < total {
                tokio::time::sleep(Duration::from_millis(self.config.part_delay_ms)).await;
            }
        }

        self.enter(observer, &PipelineStage::Split);
        let split = self.splitter.split(&parts.join(CHUNK_SEPARATOR));
        info!(
            chunks = split.chunks,
            first_len = split.first.len(),
            last_len = split.last.len(),
            "Split content into sections"
        );
        if !split.is_complete() {
            return Err(PipelineError::new(PipelineErrorKind::InsufficientContent(split.chunks)).into());
        }

        let outline = context.get(self.profile.outline_key()).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::InvalidProfile {
                profile: self.profile.name().clone(),
                reason: format!("no response stored under '{}'", self.profile.outline_key()),
            })
        })?;

        self.enter(observer, &PipelineStage::Done);
        Ok(ScriptSections::new(outline, split.first, split.last))
    }

    fn enter(&self, observer: &dyn StageObserver, stage: &PipelineStage) {
        info!(stage = %stage, "Entering stage");
        observer.on_stage(stage);
    }
}
