//! Google Gemini API implementation.
//!
//! The [`GeminiClient`] keeps one SDK client per model, each wrapped in its
//! own rate limiter. When a request names a model (via
//! `GenerateRequest.model`) the client for that model is reused or created on
//! demand; otherwise the configured default model is used.

use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use gemini_rust::{Gemini, client::Model};

use castscript_core::{GenerateRequest, GenerateResponse, Role};
use castscript_error::{CastscriptResult, GeminiError, GeminiErrorKind};
use castscript_interface::TextGenerator;
use castscript_rate_limit::{CastscriptConfig, GeminiConfig, RateLimiter, Tier, TierConfig};

use super::GeminiResult;

//
// ─── TIERED GEMINI ──────────────────────────────────────────────────────────────
//

/// Couples a Gemini SDK client with its rate limiting tier.
///
/// Wrapping both in a [`RateLimiter`] means the client is only reachable
/// through the limiter.
#[derive(Clone)]
pub struct TieredGemini<T: Tier> {
    /// The Gemini API client
    pub client: Gemini,
    /// The tier configuration for rate limiting
    pub tier: T,
}

impl<T: Tier + std::fmt::Debug> std::fmt::Debug for TieredGemini<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredGemini")
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

impl<T: Tier> Tier for TieredGemini<T> {
    fn rpm(&self) -> Option<u32> {
        self.tier.rpm()
    }

    fn tpm(&self) -> Option<u64> {
        self.tier.tpm()
    }

    fn rpd(&self) -> Option<u32> {
        self.tier.rpd()
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.tier.max_concurrent()
    }

    fn name(&self) -> &str {
        self.tier.name()
    }
}

//
// ─── CLIENT ─────────────────────────────────────────────────────────────────────
//

type ClientPool = HashMap<String, RateLimiter<TieredGemini<TierConfig>>>;

/// Client for the Google Gemini API with per-model client pooling.
pub struct GeminiClient {
    clients: Arc<Mutex<ClientPool>>,
    api_key: String,
    settings: GeminiConfig,
    base_tier: TierConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let client_count = self.clients.lock().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("GeminiClient")
            .field("model_name", &self.settings.model)
            .field("base_tier", &self.base_tier.name())
            .field("cached_clients", &client_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Convert a model name to a gemini-rust `Model`.
    ///
    /// Unrecognized names become `Model::Custom` with the `models/` prefix
    /// the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other if other.starts_with("models/") => Model::Custom(other.to_string()),
            other => Model::Custom(format!("models/{}", other)),
        }
    }

    /// Create a client from loaded configuration.
    ///
    /// Reads the API key from `GEMINI_API_KEY` and the tier named by
    /// `gemini.tier` (or the provider default) from `providers.gemini`.
    #[instrument(name = "gemini_client_from_config", skip(config))]
    pub fn from_config(config: &CastscriptConfig) -> CastscriptResult<Self> {
        let tier = config.get_tier("gemini", config.gemini.tier.as_deref());
        Self::new(config.gemini.clone(), tier)
    }

    /// Create a client reading the API key from `GEMINI_API_KEY`.
    ///
    /// Without a tier no rate limits are applied.
    pub fn new(settings: GeminiConfig, tier: Option<TierConfig>) -> CastscriptResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Self::with_api_key(api_key, settings, tier)
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(
        api_key: impl Into<String>,
        settings: GeminiConfig,
        tier: Option<TierConfig>,
    ) -> CastscriptResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into());
        }

        let base_tier = tier.unwrap_or_else(TierConfig::unlimited);
        debug!(
            model = %settings.model,
            tier = base_tier.name(),
            "Created Gemini client"
        );

        Ok(Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key,
            settings,
            base_tier,
        })
    }

    /// Generation settings applied when a request leaves them unset.
    pub fn settings(&self) -> &GeminiConfig {
        &self.settings
    }

    /// Rough token estimate (chars / 4), at least one.
    fn estimate_tokens(text: &str) -> u64 {
        (text.len() / 4).max(1) as u64
    }

    /// Rate-limited SDK client for `model_name`, created on first use.
    fn client_for(&self, model_name: &str) -> GeminiResult<RateLimiter<TieredGemini<TierConfig>>> {
        let mut clients = self.clients.lock().map_err(|_| {
            GeminiError::new(GeminiErrorKind::ClientCreation(
                "client pool lock poisoned".to_string(),
            ))
        })?;

        if let Some(existing) = clients.get(model_name) {
            return Ok(existing.clone());
        }

        let client = Gemini::with_model(&self.api_key, Self::model_name_to_enum(model_name))
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        let limiter = RateLimiter::new(TieredGemini {
            client,
            tier: self.base_tier.for_model(model_name),
        });
        debug!(model = model_name, pool_size = clients.len() + 1, "Created model client");
        clients.insert(model_name.to_string(), limiter.clone());
        Ok(limiter)
    }

    #[instrument(skip(self, req), fields(model = tracing::field::Empty))]
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model_name = req
            .model()
            .as_deref()
            .unwrap_or(self.settings.model.as_str());
        tracing::Span::current().record("model", model_name);

        let limiter = self.client_for(model_name)?;

        let max_tokens = req.max_tokens().unwrap_or(self.settings.max_output_tokens);
        let temperature = req.temperature().unwrap_or(self.settings.temperature);
        let estimate = Self::estimate_tokens(&req.prompt_text()) + max_tokens as u64;

        let _guard = limiter.acquire(estimate).await;

        let mut builder = limiter.inner().client.generate_content();
        for message in req.messages() {
            builder = match message.role {
                Role::User => builder.with_user_message(&message.content),
                Role::Assistant => builder.with_model_message(&message.content),
            };
        }

        let response = builder
            .with_temperature(temperature)
            .with_max_output_tokens(max_tokens as i32)
            .execute()
            .await
            .map_err(Self::parse_gemini_error)?;

        let text = response.text();
        debug!(response_len = text.len(), "Gemini responded");
        Ok(GenerateResponse::new(text))
    }

    /// Convert an SDK error into a structured error, keeping the HTTP status
    /// when the message carries one.
    fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
        let err_msg = err.to_string();

        // e.g. "bad response from server; code 503; description: ..."
        match Self::extract_status_code(&err_msg) {
            Some(status_code) => GeminiError::new(GeminiErrorKind::HttpError {
                status_code,
                message: err_msg,
            }),
            None => GeminiError::new(GeminiErrorKind::ApiRequest(err_msg)),
        }
    }

    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> CastscriptResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    /// Default model used when `GenerateRequest.model` is `None`.
    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
