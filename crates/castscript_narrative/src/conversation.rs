//! One conversation with a stateless text generator.

use castscript_cache::{ConversationId, ConversationStore, SharedHistory};
use castscript_error::CastscriptResult;
use castscript_interface::TextGenerator;
use castscript_rate_limit::RetryPolicy;
use std::sync::MutexGuard;
use tracing::{debug, instrument};

/// Lock the shared store, recovering the data if a holder panicked.
pub(crate) fn lock_history(history: &SharedHistory) -> MutexGuard<'_, ConversationStore> {
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sends prompts under one conversation id, replaying earlier turns.
///
/// Every prompt is expanded with the conversation's history, sent through the
/// retry policy, and optionally recorded as a new turn.
pub struct Conversation<'a, G: TextGenerator + ?Sized> {
    id: ConversationId,
    generator: &'a G,
    history: SharedHistory,
    retry: &'a RetryPolicy,
}

impl<'a, G: TextGenerator + ?Sized> Conversation<'a, G> {
    /// Start a conversation under `id`.
    pub fn new(
        id: ConversationId,
        generator: &'a G,
        history: SharedHistory,
        retry: &'a RetryPolicy,
    ) -> Self {
        Self {
            id,
            generator,
            history,
            retry,
        }
    }

    /// Conversation id.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Send `prompt` with replayed history and return the reply.
    ///
    /// When `persist` is set the raw prompt and the reply are appended as a
    /// turn; otherwise history is left untouched.
    #[instrument(skip(self, prompt), fields(conversation = %self.id, prompt_len = prompt.len()))]
    pub async fn send(&self, prompt: &str, persist: bool) -> CastscriptResult<String> {
        let full_prompt = lock_history(&self.history).build_prompt(&self.id, prompt);

        let response = self
            .retry
            .execute(|| self.generator.generate_text(&full_prompt))
            .await?;

        if persist {
            lock_history(&self.history).append_turn(&self.id, prompt, &response);
        }
        debug!(
            full_prompt_len = full_prompt.len(),
            response_len = response.len(),
            persist,
            "Exchange complete"
        );

        Ok(response)
    }

    /// Drop this conversation's history.
    pub fn clear(&self) {
        lock_history(&self.history).clear(&self.id);
    }
}
