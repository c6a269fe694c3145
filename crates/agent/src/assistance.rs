//! Assistance attempts before escalation
//!
//! [`AssistanceTracker`] is per-session state counting clarification rounds on
//! the current unresolved topic. [`AssistanceResponder`] is shared and turns
//! an attempt into a clarifying question via the completion capability.

use std::sync::Arc;

use support_agent_config::constants::{sampling, thresholds};
use support_agent_config::AssistancePrompts;
use support_agent_core::{GenerateRequest, LanguageModel, Result};

/// Bounded attempt counter for one unresolved-topic episode.
///
/// `attempt_count` never exceeds `max_attempts`; reaching it means the next
/// step is escalation.
#[derive(Debug, Clone)]
pub struct AssistanceTracker {
    max_attempts: u32,
    attempt_count: u32,
    last_query: String,
    context: Vec<String>,
}

impl AssistanceTracker {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempt_count: 0,
            last_query: String::new(),
            context: Vec::new(),
        }
    }

    pub fn should_try_to_help(&self) -> bool {
        self.attempt_count < self.max_attempts
    }

    /// Count an attempt for `query`; returns the attempt number (1-based)
    pub fn record_attempt(&mut self, query: &str) -> u32 {
        self.attempt_count = (self.attempt_count + 1).min(self.max_attempts);
        self.last_query = query.to_string();
        self.context.push(query.to_string());
        tracing::debug!(
            attempt = self.attempt_count,
            max = self.max_attempts,
            "Assistance attempt recorded"
        );
        self.attempt_count
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Queries recorded this episode, oldest first
    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn reset(&mut self) {
        self.attempt_count = 0;
        self.last_query.clear();
        self.context.clear();
    }
}

impl Default for AssistanceTracker {
    fn default() -> Self {
        Self::new(thresholds::MAX_ASSISTANCE_ATTEMPTS)
    }
}

/// Generates clarifying questions; shared by all sessions
pub struct AssistanceResponder {
    model: Arc<dyn LanguageModel>,
    prompts: AssistancePrompts,
}

impl AssistanceResponder {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: AssistancePrompts) -> Self {
        Self { model, prompts }
    }

    /// One clarifying question for `attempt`, or the error from the model
    pub async fn try_generate(&self, query: &str, attempt: u32, summary: &str) -> Result<String> {
        let request = GenerateRequest::new(self.prompts.build(attempt, summary))
            .with_user(query)
            .with_temperature(sampling::ASSISTANCE_TEMPERATURE)
            .with_max_tokens(sampling::ASSISTANCE_MAX_TOKENS);
        self.model.complete(request).await
    }

    /// Clarifying question for `attempt`, falling back to a fixed question
    pub async fn generate_helpful_response(&self, query: &str, attempt: u32, summary: &str) -> String {
        match self.try_generate(query, attempt, summary).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, attempt, "Clarifying question failed, using fallback");
                metrics::counter!("support_agent_provider_failures_total", "call_site" => "assistance")
                    .increment(1);
                self.prompts.fallback(attempt).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use support_agent_core::Error;

    #[test]
    fn test_attempts_are_bounded() {
        let mut tracker = AssistanceTracker::new(2);
        assert!(tracker.should_try_to_help());

        assert_eq!(tracker.record_attempt("where is my parcel"), 1);
        assert!(tracker.should_try_to_help());
        assert_eq!(tracker.record_attempt("my parcel is late"), 2);
        assert!(!tracker.should_try_to_help());

        // stays clamped
        assert_eq!(tracker.record_attempt("hello?"), 2);
        assert!(!tracker.should_try_to_help());
        assert_eq!(tracker.last_query(), "hello?");
        assert_eq!(tracker.context().len(), 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tracker = AssistanceTracker::default();
        tracker.record_attempt("a");
        tracker.record_attempt("b");
        tracker.reset();

        assert_eq!(tracker.attempt_count(), 0);
        assert!(tracker.context().is_empty());
        assert_eq!(tracker.last_query(), "");
        assert!(tracker.should_try_to_help());
    }

    #[test]
    fn test_zero_max_is_raised_to_one() {
        let mut tracker = AssistanceTracker::new(0);
        assert!(tracker.should_try_to_help());
        tracker.record_attempt("x");
        assert!(!tracker.should_try_to_help());
    }

    struct Failing;

    #[async_trait]
    impl LanguageModel for Failing {
        async fn complete(&self, _request: GenerateRequest) -> Result<String> {
            Err(Error::Provider("HTTP 429: rate limited".into()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    struct Echo;

    #[async_trait]
    impl LanguageModel for Echo {
        async fn complete(&self, request: GenerateRequest) -> Result<String> {
            Ok(format!(
                "{}|{}",
                request.system_prompt.contains("SECOND attempt"),
                request.last_user_message().unwrap_or_default()
            ))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_fallback_per_attempt() {
        let responder = AssistanceResponder::new(Arc::new(Failing), AssistancePrompts::default());
        assert_eq!(
            responder.generate_helpful_response("q", 1, "summary").await,
            "Could you tell me more about what you need?"
        );
        assert_eq!(
            responder.generate_helpful_response("q", 2, "summary").await,
            "Can you rephrase your question? I want to help you properly."
        );
    }

    #[tokio::test]
    async fn test_prompt_follows_attempt() {
        let responder = AssistanceResponder::new(Arc::new(Echo), AssistancePrompts::default());
        assert_eq!(
            responder.generate_helpful_response("refund?", 1, "s").await,
            "false|refund?"
        );
        assert_eq!(
            responder.generate_helpful_response("refund?", 2, "s").await,
            "true|refund?"
        );
    }
}
