//! Knowledge store
//!
//! Holds the current [`KnowledgeSnapshot`] behind a lock and swaps it whole on
//! reload, so readers never see a partially loaded knowledge base.
//!
//! # Example
//!
//! ```ignore
//! let store = KnowledgeStore::new(model, RelevancePrompt::default());
//! store.load(snapshot);
//!
//! if let Some(answer) = store.get_direct_answer("What are your hours?") {
//!     return answer;
//! }
//! let context = store.get_relevant_context("delivery fees", 3000);
//! ```

use parking_lot::RwLock;
use std::sync::Arc;

use support_agent_config::constants::{retrieval, sampling};
use support_agent_config::RelevancePrompt;
use support_agent_core::{GenerateRequest, KnowledgeSnapshot, LanguageModel, RelevanceResult, Result};

use crate::matching;
use crate::relevance::parse_relevance;

/// Current knowledge base plus the model used for relevance checks
pub struct KnowledgeStore {
    snapshot: RwLock<Option<Arc<KnowledgeSnapshot>>>,
    model: Arc<dyn LanguageModel>,
    prompt: RelevancePrompt,
}

impl KnowledgeStore {
    pub fn new(model: Arc<dyn LanguageModel>, prompt: RelevancePrompt) -> Self {
        Self {
            snapshot: RwLock::new(None),
            model,
            prompt,
        }
    }

    /// Replace the current snapshot
    pub fn load(&self, snapshot: KnowledgeSnapshot) {
        let entries = snapshot.len();
        let fields = snapshot.headers.len();
        *self.snapshot.write() = Some(Arc::new(snapshot));
        tracing::info!(entries, fields, "Knowledge base loaded");
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Shared handle to the current snapshot
    pub fn snapshot(&self) -> Option<Arc<KnowledgeSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Stored answer for a question matching `query`, if any
    pub fn get_direct_answer(&self, query: &str) -> Option<String> {
        let snapshot = self.snapshot()?;
        let answer = matching::direct_answer(&snapshot, query);
        if answer.is_some() {
            tracing::debug!(query, "Direct answer matched");
        }
        answer
    }

    /// Keyword-ranked context block; empty when nothing is loaded
    pub fn get_relevant_context(&self, query: &str, max_length: usize) -> String {
        match self.snapshot() {
            Some(snapshot) => matching::relevant_context(&snapshot, query, max_length),
            None => String::new(),
        }
    }

    /// Ask the model whether `query` is answerable from the knowledge base.
    ///
    /// Not loaded means not relevant. Provider and parse failures are
    /// returned to the caller.
    pub async fn check_relevance(&self, query: &str) -> Result<RelevanceResult> {
        let Some(snapshot) = self.snapshot() else {
            tracing::debug!("Relevance check without knowledge base");
            return Ok(RelevanceResult::not_relevant());
        };

        let excerpt = excerpt(&snapshot.raw_content, retrieval::RELEVANCE_EXCERPT_LENGTH);
        let request = GenerateRequest::new(self.prompt.build(excerpt))
            .with_user(self.prompt.question(query))
            .with_temperature(sampling::RELEVANCE_TEMPERATURE)
            .with_max_tokens(sampling::RELEVANCE_MAX_TOKENS);

        let output = self.model.complete(request).await?;
        let result = parse_relevance(&output)?;

        tracing::debug!(
            relevant = result.is_relevant,
            confidence = result.confidence,
            reasoning = ?result.reasoning,
            "Relevance checked"
        );
        Ok(result)
    }

    /// One-line description of what is loaded
    pub fn get_summary(&self) -> String {
        match self.snapshot() {
            Some(snapshot) => format!(
                "Knowledge Base: {} entries with fields: {}",
                snapshot.len(),
                snapshot.headers.join(", ")
            ),
            None => "No knowledge base loaded".to_string(),
        }
    }
}

/// First `max_chars` characters
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use support_agent_core::{Error, KnowledgeEntry};

    struct ScriptedModel {
        reply: Result<String>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedModel {
        fn new(reply: Result<String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, request: GenerateRequest) -> Result<String> {
            self.requests.lock().push(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(Error::Provider("HTTP 500".into())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn bakery() -> KnowledgeSnapshot {
        KnowledgeSnapshot::new(
            vec!["Question".into(), "Answer".into()],
            vec![
                KnowledgeEntry::new()
                    .with("Question", "What are your hours?")
                    .with("Answer", "9am-5pm"),
                KnowledgeEntry::new()
                    .with("Question", "Do you deliver?")
                    .with("Answer", "Yes, within the city"),
            ],
        )
    }

    #[test]
    fn test_empty_store() {
        let store = KnowledgeStore::new(ScriptedModel::new(Ok(String::new())), RelevancePrompt::default());
        assert!(!store.is_loaded());
        assert_eq!(store.get_direct_answer("What are your hours?"), None);
        assert_eq!(store.get_relevant_context("hours", 3000), "");
        assert_eq!(store.get_summary(), "No knowledge base loaded");
    }

    #[test]
    fn test_load_replaces_snapshot() {
        let store = KnowledgeStore::new(ScriptedModel::new(Ok(String::new())), RelevancePrompt::default());
        store.load(bakery());
        assert_eq!(
            store.get_summary(),
            "Knowledge Base: 2 entries with fields: Question, Answer"
        );
        assert_eq!(store.get_direct_answer("what time do you open").as_deref(), Some("9am-5pm"));

        store.load(KnowledgeSnapshot::new(vec!["Question".into(), "Answer".into()], vec![]));
        assert_eq!(store.get_direct_answer("what time do you open"), None);
    }

    #[tokio::test]
    async fn test_relevance_without_knowledge_skips_model() {
        let model = ScriptedModel::new(Ok(r#"{"isRelevant": true, "confidence": 90}"#.into()));
        let store = KnowledgeStore::new(model.clone(), RelevancePrompt::default());

        let result = store.check_relevance("anything").await.unwrap();
        assert_eq!(result, RelevanceResult::not_relevant());
        assert!(model.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_relevance_prompt_carries_excerpt_and_question() {
        let model = ScriptedModel::new(Ok(r#"{"isRelevant": true, "confidence": 80}"#.into()));
        let store = KnowledgeStore::new(model.clone(), RelevancePrompt::default());
        store.load(bakery());

        let result = store.check_relevance("Do you deliver to the airport?").await.unwrap();
        assert!(result.is_answerable(30));

        let requests = model.requests.lock();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system_prompt.contains("- Question: Do you deliver?"));
        assert_eq!(
            requests[0].last_user_message(),
            Some("Question: \"Do you deliver to the airport?\"")
        );
        assert_eq!(requests[0].temperature, sampling::RELEVANCE_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_relevance_errors_propagate() {
        let store = KnowledgeStore::new(
            ScriptedModel::new(Err(Error::Provider("down".into()))),
            RelevancePrompt::default(),
        );
        store.load(bakery());
        assert!(store.check_relevance("hours").await.is_err());

        let store = KnowledgeStore::new(ScriptedModel::new(Ok("maybe".into())), RelevancePrompt::default());
        store.load(bakery());
        assert!(matches!(
            store.check_relevance("hours").await,
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        assert_eq!(excerpt("مرحبا", 3), "مرح");
        assert_eq!(excerpt("abc", 10), "abc");
    }
}
