//! Shared helpers for server tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use castscript_cache::{ConversationStore, HistoryConfig};
use castscript_core::{GenerateRequest, GenerateResponse};
use castscript_error::{CastscriptResult, GeminiError, GeminiErrorKind};
use castscript_interface::TextGenerator;
use castscript_narrative::PipelineConfig;
use castscript_rate_limit::RetryPolicy;
use castscript_server::{AppState, ServerConfig, router};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Generator that answers every prompt through a function, or always fails.
pub struct ScriptedGenerator {
    respond: Option<fn(&str) -> String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn responding(respond: fn(&str) -> String) -> Arc<Self> {
        Arc::new(Self {
            respond: Some(respond),
            calls: AtomicUsize::new(0),
        })
    }

    /// Fails every call with a non-retryable upstream error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            respond: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, req: &GenerateRequest) -> CastscriptResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.respond {
            Some(respond) => Ok(GenerateResponse::new(respond(&req.prompt_text()))),
            None => Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: 400,
                message: "API key not valid".to_string(),
            })
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Two-part scripts for the `actor_brief` profile.
pub fn two_part_script(prompt: &str) -> String {
    if prompt.ends_with("Example of correct output: 5") {
        "2".to_string()
    } else {
        "Paragraph one.\n\nParagraph two.".to_string()
    }
}

/// Echo the prompt back.
pub fn echo(prompt: &str) -> String {
    format!("echo: {}", prompt)
}

pub fn state_for(generator: Arc<dyn TextGenerator>) -> AppState {
    AppState::new(
        generator,
        ConversationStore::shared(HistoryConfig::default()),
        RetryPolicy::disabled(),
        PipelineConfig::default()
            .with_part_delay_ms(0)
            .with_batch_delay_ms(0),
    )
    .unwrap()
}

pub fn app(generator: Arc<dyn TextGenerator>) -> Router {
    router(state_for(generator), &ServerConfig::default())
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
