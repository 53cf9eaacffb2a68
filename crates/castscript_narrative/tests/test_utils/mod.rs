//! Test utilities for pipeline tests.
//!
//! Provides a scripted [`MockGenerator`] and helpers for building pipelines
//! around it.

#![allow(dead_code)]

use async_trait::async_trait;
use castscript_cache::{ConversationStore, HistoryConfig, SharedHistory};
use castscript_core::{GenerateRequest, GenerateResponse};
use castscript_error::{CastscriptError, CastscriptResult, GeminiError, GeminiErrorKind};
use castscript_interface::TextGenerator;
use castscript_narrative::{PipelineConfig, ScriptPipeline, ScriptProfile};
use castscript_rate_limit::RetryPolicy;
use std::sync::{Arc, Mutex};

/// Behavior configuration for mock responses.
#[derive(Clone)]
pub enum MockBehavior {
    /// Always return success with the given text
    Success(String),
    /// Always return the specified error
    Error(GeminiErrorKind),
    /// Fail N times with the error, then succeed with the text
    FailThenSucceed {
        fail_count: usize,
        error: GeminiErrorKind,
        success_text: String,
    },
    /// Return a sequence of responses (errors or success)
    Sequence(Vec<MockResponse>),
    /// Compute the reply from the full prompt
    Respond(fn(&str) -> String),
}

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(GeminiErrorKind),
}

/// Mock text generator that records every prompt it receives.
pub struct MockGenerator {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always succeed with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Always fail with `error`.
    pub fn new_error(error: GeminiErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    /// Fail `fail_count` times, then succeed.
    pub fn new_fail_then_succeed(
        fail_count: usize,
        error: GeminiErrorKind,
        success_text: impl Into<String>,
    ) -> Self {
        Self::new_with_behavior(MockBehavior::FailThenSucceed {
            fail_count,
            error,
            success_text: success_text.into(),
        })
    }

    /// Return successes in order.
    pub fn new_replies(replies: &[&str]) -> Self {
        Self::new_sequence(
            replies
                .iter()
                .map(|r| MockResponse::Success(r.to_string()))
                .collect(),
        )
    }

    /// Return the given responses in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Reply with `respond(full_prompt)`.
    pub fn new_responder(respond: fn(&str) -> String) -> Self {
        Self::new_with_behavior(MockBehavior::Respond(respond))
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self, prompt: &str) -> CastscriptResult<GenerateResponse> {
        let current = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };

        let fail = |kind: &GeminiErrorKind| Err(CastscriptError::from(GeminiError::new(kind.clone())));

        match &self.behavior {
            MockBehavior::Success(text) => Ok(GenerateResponse::new(text.clone())),
            MockBehavior::Error(kind) => fail(kind),
            MockBehavior::FailThenSucceed {
                fail_count,
                error,
                success_text,
            } => {
                if current < *fail_count {
                    fail(error)
                } else {
                    Ok(GenerateResponse::new(success_text.clone()))
                }
            }
            MockBehavior::Sequence(responses) => match responses.get(current) {
                Some(MockResponse::Success(text)) => Ok(GenerateResponse::new(text.clone())),
                Some(MockResponse::Error(kind)) => fail(kind),
                None => fail(&GeminiErrorKind::ApiRequest(format!(
                    "Mock sequence exhausted (call {} beyond {} responses)",
                    current + 1,
                    responses.len()
                ))),
            },
            MockBehavior::Respond(respond) => Ok(GenerateResponse::new(respond(prompt))),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, req: &GenerateRequest) -> CastscriptResult<GenerateResponse> {
        self.next_response(&req.prompt_text())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Retry policy with millisecond backoff.
pub fn fast_retry(max_retries: usize) -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(max_retries)
        .initial_backoff_ms(1)
        .max_delay_secs(1)
        .build()
        .unwrap()
}

pub fn shared_history() -> SharedHistory {
    ConversationStore::shared(HistoryConfig::default())
}

/// Pipeline over `mock` with the named bundled profile.
pub fn pipeline_for(
    mock: Arc<MockGenerator>,
    profile: &str,
) -> (ScriptPipeline<MockGenerator>, SharedHistory) {
    pipeline_with_profile(mock, ScriptProfile::builtin(profile).unwrap())
}

/// Pipeline over `mock` with an explicit profile.
pub fn pipeline_with_profile(
    mock: Arc<MockGenerator>,
    profile: ScriptProfile,
) -> (ScriptPipeline<MockGenerator>, SharedHistory) {
    let history = shared_history();
    let pipeline = ScriptPipeline::new(
        mock,
        history.clone(),
        fast_retry(2),
        PipelineConfig::default(),
        profile,
    );
    (pipeline, history)
}
