//! Transcript-to-script pipeline for castscript.
//!
//! A [`ScriptPipeline`] turns one video transcript into a long-form narration
//! script by holding a multi-turn conversation with a [`TextGenerator`]: it
//! drafts an outline, writes the script part by part, and splits the result
//! into first and last sections. What it asks at each step comes from a
//! [`ScriptProfile`].
//!
//! [`BatchRunner`] applies a pipeline to many transcripts in sequence,
//! recording per-item outcomes.
//!
//! [`TextGenerator`]: castscript_interface::TextGenerator

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod conversation;
mod pipeline;
mod profile;
mod split;
mod template;

pub use batch::{BatchObserver, BatchRunner, FnBatchObserver, NoopBatchObserver};
pub use conversation::Conversation;
pub use pipeline::{
    NoopStageObserver, PipelineConfig, PipelineConfigBuilder, PipelineStage, ScriptPipeline,
    StageObserver, parse_part_count,
};
pub use profile::{PartCount, PartPlan, PreambleStage, PromptStep, ScriptProfile};
pub use split::{MidpointSplitter, SectionSplit, SectionSplitter, split_sections};
pub use template::{TemplateContext, placeholders, render_template};
