//! Every configuration section, loaded from one layered source.

use castscript_cache::HistoryConfig;
use castscript_error::{CastscriptResult, ConfigError};
use castscript_narrative::PipelineConfig;
use castscript_rate_limit::{CastscriptConfig, layered_sources};
use castscript_server::ServerConfig;
use derive_getters::Getters;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// All settings the binary needs.
///
/// Precedence, lowest first: bundled defaults,
/// `~/.config/castscript/castscript.toml`, `./castscript.toml`, the file
/// passed with `--config`, then `CASTSCRIPT__SECTION__KEY` variables.
#[derive(Debug, Clone, Default, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct Settings {
    /// Provider tiers, Gemini settings and retry policy
    #[serde(flatten)]
    upstream: CastscriptConfig,

    /// Conversation history limits
    #[serde(default)]
    history: HistoryConfig,

    /// Pipeline delays, part cap and default profile
    #[serde(default)]
    pipeline: PipelineConfig,

    /// HTTP listener
    #[serde(default)]
    server: ServerConfig,
}

impl Settings {
    /// Load with the standard precedence, plus `explicit` if given.
    ///
    /// # Errors
    ///
    /// Fails when the explicit file is missing or any source is malformed.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> CastscriptResult<Self> {
        let config = layered_sources(explicit)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?;

        let settings: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        debug!(
            model = %settings.upstream.gemini.model,
            profile = %settings.pipeline.profile(),
            bind = %settings.server.bind(),
            "Settings loaded"
        );
        Ok(settings)
    }
}
