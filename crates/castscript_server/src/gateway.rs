//! Client for a remote castscript `/api/gemini` endpoint.

use crate::{PromptBody, PromptReply};
use async_trait::async_trait;
use castscript_core::{GenerateRequest, GenerateResponse};
use castscript_error::{CastscriptResult, GeminiError, GeminiErrorKind};
use castscript_interface::TextGenerator;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Text generation through another castscript server.
///
/// Lets a machine without a Gemini key run pipelines against a server that
/// has one. Each `generate` is one POST; retries are left to the caller.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    /// Create a client for the server at `base_url` (e.g. `http://host:3000`).
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeminiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        tracing::debug!(base_url = %base_url, "Created gateway client");
        Ok(Self { base_url, client })
    }

    /// Server root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the remote server answers `/health`.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health_check(&self) -> Result<(), GeminiError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Gateway is healthy");
            Ok(())
        } else {
            Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message: format!("Health check returned {}", status),
            }))
        }
    }

    /// Send one prompt and return the generated text.
    #[instrument(skip(self, prompt), fields(base_url = %self.base_url, prompt_len = prompt.len()))]
    pub async fn send_prompt(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!("{}/api/gemini", self.base_url);
        let body = PromptBody {
            prompt: Some(prompt.to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Gateway request failed");
                GeminiError::new(GeminiErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            tracing::warn!(status = status.as_u16(), %message, "Gateway returned an error");
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        let reply: PromptReply = response
            .json()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::MalformedResponse(e.to_string())))?;
        Ok(reply.response)
    }
}

#[async_trait]
impl TextGenerator for GatewayClient {
    async fn generate(&self, req: &GenerateRequest) -> CastscriptResult<GenerateResponse> {
        let text = self.send_prompt(&req.prompt_text()).await?;
        Ok(GenerateResponse::new(text))
    }

    fn provider_name(&self) -> &'static str {
        "gateway"
    }

    fn model_name(&self) -> &str {
        &self.base_url
    }
}
