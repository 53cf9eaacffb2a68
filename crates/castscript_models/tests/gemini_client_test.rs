#![cfg(feature = "gemini")]

// Tests for the Gemini client.
//
// Tests marked `#[cfg_attr(not(feature = "api"), ignore)]` hit the real
// Gemini API and need GEMINI_API_KEY.

use castscript_core::{ConversationMessage, GenerateRequest};
use castscript_error::{CastscriptErrorKind, GeminiErrorKind};
use castscript_interface::TextGenerator;
use castscript_models::GeminiClient;
use castscript_rate_limit::{CastscriptConfig, GeminiConfig};

#[test]
fn test_client_reports_configured_model() -> anyhow::Result<()> {
    let settings = GeminiConfig {
        model: "gemini-2.0-flash".to_string(),
        ..GeminiConfig::default()
    };
    let client = GeminiClient::with_api_key("test-key", settings, None)?;

    assert_eq!(client.provider_name(), "gemini");
    assert_eq!(client.model_name(), "gemini-2.0-flash");
    Ok(())
}

#[test]
fn test_empty_api_key_is_missing_key() {
    let err = GeminiClient::with_api_key("", GeminiConfig::default(), None).unwrap_err();
    match err.kind() {
        CastscriptErrorKind::Gemini(e) => assert_eq!(e.kind, GeminiErrorKind::MissingApiKey),
        other => panic!("Expected Gemini error, got {:?}", other),
    }
}

#[test]
fn test_client_from_bundled_config() -> anyhow::Result<()> {
    let config = CastscriptConfig::load()?;
    let tier = config.get_tier("gemini", None);
    let client = GeminiClient::with_api_key("test-key", config.gemini.clone(), tier)?;

    assert_eq!(client.model_name(), config.gemini.model);
    assert_eq!(client.settings().max_output_tokens, 4096);
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_generate_text() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = CastscriptConfig::load()?;
    let client = GeminiClient::from_config(&config)?;

    let text = client
        .generate_text("Reply with the single word: pong")
        .await?;
    assert!(!text.trim().is_empty());
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_model_override() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = CastscriptConfig::load()?;
    let client = GeminiClient::from_config(&config)?;

    let request = GenerateRequest::builder()
        .messages(vec![ConversationMessage::user("Say hi")])
        .model(Some("gemini-2.5-flash-lite".to_string()))
        .max_tokens(Some(16))
        .build()?;

    let response = client.generate(&request).await?;
    assert!(!response.text.is_empty());
    Ok(())
}
