//! Conversation history store.

use crate::ConversationId;
use castscript_core::ConversationMessage;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Heading placed before replayed turns.
const HISTORY_HEADER: &str = "Lịch sử trò chuyện:";

/// Label placed before the new prompt when history is replayed.
const CURRENT_PROMPT_LABEL: &str = "Prompt hiện tại:";

/// Store shared between tasks. Never hold the lock across an `.await`.
pub type SharedHistory = Arc<Mutex<ConversationStore>>;

/// Ordered turns of one conversation.
#[derive(Debug, Clone, Getters)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
    last_updated: DateTime<Utc>,
    #[getter(skip)]
    touched: Instant,
}

impl ConversationHistory {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            last_updated: Utc::now(),
            touched: Instant::now(),
        }
    }

    /// Number of user/assistant exchanges recorded.
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.touched.elapsed() > ttl
    }
}

/// Configuration for the history store.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct HistoryConfig {
    /// Idle time after which a conversation is dropped (seconds)
    #[serde(default = "default_ttl_secs")]
    ttl_secs: u64,

    /// Maximum number of conversations kept at once
    #[serde(default = "default_max_entries")]
    max_entries: usize,

    /// Whether turns are recorded at all
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    256
}

fn default_enabled() -> bool {
    true
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            enabled: default_enabled(),
        }
    }
}

impl HistoryConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> HistoryConfigBuilder {
        HistoryConfigBuilder::default()
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Conversation histories keyed by [`ConversationId`].
///
/// Conversations idle for longer than the TTL are dropped on access, and
/// adding a conversation to a full store evicts the least recently used one.
///
/// # Example
///
/// ```
/// use castscript_cache::{ConversationId, ConversationStore, HistoryConfig};
///
/// let mut store = ConversationStore::new(HistoryConfig::default());
/// let id = ConversationId::generate("transcript");
///
/// // No history yet: the prompt goes out unchanged
/// assert_eq!(store.build_prompt(&id, "Outline this"), "Outline this");
///
/// store.append_turn(&id, "Outline this", "1. Intro");
/// let prompt = store.build_prompt(&id, "Now count the parts");
/// assert!(prompt.contains("User: Outline this\n\nAI: 1. Intro"));
/// assert!(prompt.ends_with("Now count the parts"));
/// ```
#[derive(Debug)]
pub struct ConversationStore {
    config: HistoryConfig,
    entries: HashMap<ConversationId, ConversationHistory>,
    access_order: Vec<ConversationId>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new(config: HistoryConfig) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            max_entries = config.max_entries,
            enabled = config.enabled,
            "Creating conversation store"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Create an empty store wrapped for sharing between tasks.
    pub fn shared(config: HistoryConfig) -> SharedHistory {
        Arc::new(Mutex::new(Self::new(config)))
    }

    /// The store's configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Existing history for `id`, or a new empty one.
    #[tracing::instrument(skip(self), fields(conversation = %id, size = self.entries.len()))]
    pub fn get_or_create(&mut self, id: &ConversationId) -> &ConversationHistory {
        self.expire_if_stale(id);

        if !self.entries.contains_key(id) {
            if self.entries.len() >= self.config.max_entries {
                self.evict_lru();
            }
            tracing::debug!("Starting new conversation");
            self.entries.insert(id.clone(), ConversationHistory::new());
        }

        self.touch(id);
        &self.entries[id]
    }

    /// Record one exchange and bump `last_updated`.
    #[tracing::instrument(
        skip(self, user_content, assistant_content),
        fields(conversation = %id, user_len = user_content.len(), assistant_len = assistant_content.len())
    )]
    pub fn append_turn(&mut self, id: &ConversationId, user_content: &str, assistant_content: &str) {
        if !self.config.enabled {
            tracing::debug!("History disabled, skipping append");
            return;
        }

        self.get_or_create(id);
        if let Some(history) = self.entries.get_mut(id) {
            history.messages.push(ConversationMessage::user(user_content));
            history
                .messages
                .push(ConversationMessage::assistant(assistant_content));
            history.last_updated = Utc::now();
            history.touched = Instant::now();
            tracing::debug!(turns = history.turns(), "Appended turn");
        }
    }

    /// Full prompt to send upstream: prior turns followed by `new_prompt`.
    ///
    /// Each turn renders as `"{role}: {content}"` and turns are separated by
    /// blank lines. With no prior turns the prompt is returned unchanged.
    pub fn build_prompt(&mut self, id: &ConversationId, new_prompt: &str) -> String {
        let Some(history) = self.get(id) else {
            return new_prompt.to_string();
        };
        if history.messages.is_empty() {
            return new_prompt.to_string();
        }

        let turns = history
            .messages
            .iter()
            .map(ConversationMessage::render)
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\n{}\n\n{} {}",
            HISTORY_HEADER, turns, CURRENT_PROMPT_LABEL, new_prompt
        )
    }

    /// History for `id` if present and not expired.
    pub fn get(&mut self, id: &ConversationId) -> Option<&ConversationHistory> {
        self.expire_if_stale(id);
        if !self.entries.contains_key(id) {
            return None;
        }
        self.touch(id);
        self.entries.get(id)
    }

    /// Remove one conversation. Returns whether it existed.
    #[tracing::instrument(skip(self), fields(conversation = %id))]
    pub fn clear(&mut self, id: &ConversationId) -> bool {
        self.forget_order(id);
        let removed = self.entries.remove(id).is_some();
        tracing::debug!(removed, "Cleared conversation");
        removed
    }

    /// Remove every conversation.
    pub fn clear_all(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared all conversations");
    }

    /// Ids of conversations that have not expired, least recently used first.
    pub fn active_ids(&self) -> Vec<ConversationId> {
        let ttl = self.config.ttl();
        self.access_order
            .iter()
            .filter(|id| self.entries.get(*id).is_some_and(|h| !h.is_expired(ttl)))
            .cloned()
            .collect()
    }

    /// Drop every expired conversation; returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let ttl = self.config.ttl();
        let before = self.entries.len();

        self.entries.retain(|_, history| !history.is_expired(ttl));
        let entries = &self.entries;
        self.access_order.retain(|id| entries.contains_key(id));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = self.entries.len(), "Cleaned up expired conversations");
        }
        removed
    }

    /// Number of stored conversations, including any not yet cleaned up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no conversations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expire_if_stale(&mut self, id: &ConversationId) {
        let ttl = self.config.ttl();
        if self.entries.get(id).is_some_and(|h| h.is_expired(ttl)) {
            tracing::debug!(conversation = %id, "Conversation expired, removing");
            self.entries.remove(id);
            self.forget_order(id);
        }
    }

    fn touch(&mut self, id: &ConversationId) {
        self.forget_order(id);
        self.access_order.push(id.clone());
        if let Some(history) = self.entries.get_mut(id) {
            history.touched = Instant::now();
        }
    }

    fn forget_order(&mut self, id: &ConversationId) {
        if let Some(pos) = self.access_order.iter().position(|k| k == id) {
            self.access_order.remove(pos);
        }
    }

    fn evict_lru(&mut self) {
        if self.access_order.is_empty() {
            return;
        }
        let id = self.access_order.remove(0);
        if let Some(history) = self.entries.remove(&id) {
            tracing::warn!(
                conversation = %id,
                turns = history.turns(),
                idle_ms = history.touched.elapsed().as_millis() as u64,
                max_entries = self.config.max_entries,
                "Store full, evicted least recently used conversation"
            );
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}
