// Full pipeline runs against the real Gemini API.
//
// Ignored unless built with `--features api`; needs GEMINI_API_KEY.

use castscript_cache::{ConversationStore, HistoryConfig};
use castscript_models::GeminiClient;
use castscript_narrative::{PipelineConfig, ScriptPipeline, ScriptProfile};
use castscript_rate_limit::CastscriptConfig;
use std::sync::Arc;

const TRANSCRIPT: &str = "A short documentary about the 1972 film The Godfather, \
its director Francis Ford Coppola and the actors Marlon Brando and James Caan.";

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_actor_brief() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = CastscriptConfig::load()?;
    let history = ConversationStore::shared(HistoryConfig::default());

    let pipeline = ScriptPipeline::new(
        Arc::new(GeminiClient::from_config(&config)?),
        Arc::clone(&history),
        config.retry.clone(),
        PipelineConfig::default(),
        ScriptProfile::builtin("actor_brief")?,
    );

    let result = pipeline.process(TRANSCRIPT).await;

    assert!(result.success(), "pipeline failed: {:?}", result.error());
    assert!(!result.outline().unwrap_or_default().is_empty());
    assert!(!result.first_sections().unwrap_or_default().is_empty());
    assert!(!result.last_sections().unwrap_or_default().is_empty());
    assert!(history.lock().unwrap().is_empty());
    Ok(())
}
