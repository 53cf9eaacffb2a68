//! Backend selection.

use crate::Settings;
use castscript_error::CastscriptResult;
use castscript_interface::TextGenerator;
use castscript_models::GeminiClient;
use castscript_server::GatewayClient;
use std::sync::Arc;
use tracing::info;

/// Text generator for the given settings.
///
/// With a gateway URL prompts go to a remote castscript server; otherwise
/// Gemini is called directly with `GEMINI_API_KEY`.
///
/// # Errors
///
/// Fails when the API key is unset (direct mode) or the HTTP client cannot be
/// built (gateway mode).
pub fn build_generator(
    settings: &Settings,
    gateway: Option<&str>,
) -> CastscriptResult<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match gateway {
        Some(url) => Arc::new(GatewayClient::new(url)?),
        None => Arc::new(GeminiClient::from_config(settings.upstream())?),
    };
    info!(
        provider = generator.provider_name(),
        model = generator.model_name(),
        "Text generator ready"
    );
    Ok(generator)
}
