//! Text completion capability

use async_trait::async_trait;

use crate::{ConversationTurn, Result};

/// A single completion call: system instruction, ordered messages and
/// sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub system_prompt: String,
    pub messages: Vec<ConversationTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerateRequest {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    /// Append prior turns
    pub fn with_history(mut self, history: &[ConversationTurn]) -> Self {
        self.messages.extend_from_slice(history);
        self
    }

    /// Append the user message that the completion should respond to
    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ConversationTurn::user(content));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Content of the final user message, if any
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|t| t.role == crate::Role::User)
            .map(|t| t.content.as_str())
    }
}

/// Language model backend.
///
/// Implementations fail with `Error::Provider` on transport or non-2xx
/// failures and `Error::EmptyResponse` when no content is returned.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete the request and return the trimmed text
    async fn complete(&self, request: GenerateRequest) -> Result<String>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}
