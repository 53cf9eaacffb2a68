//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the castscript binary.

mod batch;
mod commands;
mod process;
mod serve;

pub use batch::run_batch;
pub use commands::{Cli, Commands};
pub use process::{ProcessOutputs, process_transcript};
pub use serve::run_server;

use castscript::{
    CastscriptResult, ConversationStore, ScriptPipeline, ScriptProfile, Settings, TextGenerator,
};
use std::sync::Arc;

/// Pipeline for a CLI run: the named profile, or the configured default.
fn pipeline_for(
    settings: &Settings,
    generator: Arc<dyn TextGenerator>,
    profile: Option<&str>,
) -> CastscriptResult<ScriptPipeline<dyn TextGenerator>> {
    let profile = profile.unwrap_or(settings.pipeline().profile().as_str());
    let profile = ScriptProfile::resolve(profile)?;
    Ok(ScriptPipeline::new(
        generator,
        ConversationStore::shared(settings.history().clone()),
        settings.upstream().retry.clone(),
        settings.pipeline().clone(),
        profile,
    ))
}
