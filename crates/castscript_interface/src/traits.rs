//! Text generation backend trait.

use async_trait::async_trait;
use castscript_core::{ConversationMessage, GenerateRequest, GenerateResponse};
use castscript_error::{BuilderError, CastscriptResult, GeminiError, GeminiErrorKind};
use std::sync::Arc;

/// A remote text completion service.
///
/// Implementations make exactly one upstream call per `generate` and never
/// retry; retrying is the caller's decision.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a request.
    async fn generate(&self, req: &GenerateRequest) -> CastscriptResult<GenerateResponse>;

    /// Provider name (e.g., "gemini", "gateway").
    fn provider_name(&self) -> &'static str;

    /// Model identifier used when the request does not name one.
    fn model_name(&self) -> &str;

    /// Send a single prompt and return the completion text.
    ///
    /// # Errors
    ///
    /// Fails with [`GeminiErrorKind::EmptyResponse`] when the service answers
    /// with blank text, or with whatever `generate` reports.
    async fn generate_text(&self, prompt: &str) -> CastscriptResult<String> {
        let request = GenerateRequest::builder()
            .messages(vec![ConversationMessage::user(prompt)])
            .build()
            .map_err(|e| BuilderError::from(e.to_string()))?;

        let response = self.generate(&request).await?;
        if response.text.trim().is_empty() {
            tracing::warn!(provider = self.provider_name(), "Model returned empty text");
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse).into());
        }
        Ok(response.text)
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> CastscriptResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
