//! Shared request state.

use castscript_cache::SharedHistory;
use castscript_error::CastscriptResult;
use castscript_interface::TextGenerator;
use castscript_narrative::{PipelineConfig, ScriptPipeline, ScriptProfile};
use castscript_rate_limit::RetryPolicy;
use std::sync::Arc;

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn TextGenerator>,
    history: SharedHistory,
    retry: RetryPolicy,
    pipeline: PipelineConfig,
    default_profile: ScriptProfile,
}

impl AppState {
    /// Build state, resolving the configured default profile up front.
    ///
    /// # Errors
    ///
    /// Fails when the configured profile is neither bundled nor a readable
    /// profile file.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        history: SharedHistory,
        retry: RetryPolicy,
        pipeline: PipelineConfig,
    ) -> CastscriptResult<Self> {
        let default_profile = ScriptProfile::resolve(pipeline.profile())?;
        tracing::info!(
            provider = generator.provider_name(),
            model = generator.model_name(),
            profile = %default_profile.name(),
            "Server state ready"
        );
        Ok(Self {
            generator,
            history,
            retry,
            pipeline,
            default_profile,
        })
    }

    /// The text generation backend.
    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Pipeline for a request.
    ///
    /// Requests may only name bundled profiles; profile files are for the
    /// operator's configuration.
    pub fn pipeline(&self, profile: Option<&str>) -> CastscriptResult<ScriptPipeline<dyn TextGenerator>> {
        let profile = match profile.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => ScriptProfile::builtin(name)?,
            None => self.default_profile.clone(),
        };
        Ok(ScriptPipeline::new(
            Arc::clone(&self.generator),
            Arc::clone(&self.history),
            self.retry.clone(),
            self.pipeline.clone(),
            profile,
        ))
    }
}
