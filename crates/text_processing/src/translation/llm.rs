//! Completion-backed translator

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use support_agent_config::constants::sampling;
use support_agent_config::TranslationPrompts;
use support_agent_core::{Error, GenerateRequest, Language, LanguageModel, Result, Translator};

use super::TranslationConfig;

/// Bounded translation cache; clears half when full
struct TranslationCache {
    entries: HashMap<String, String>,
    max_size: usize,
}

impl TranslationCache {
    fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_size: max_size.max(2),
        }
    }

    fn make_key(text: &str, from: Language, to: Language) -> String {
        format!("{}:{}:{}", from, to, text)
    }

    fn get(&self, text: &str, from: Language, to: Language) -> Option<String> {
        self.entries.get(&Self::make_key(text, from, to)).cloned()
    }

    fn insert(&mut self, text: &str, from: Language, to: Language, translation: String) {
        if self.entries.len() >= self.max_size {
            let evict: Vec<_> = self
                .entries
                .keys()
                .take(self.max_size / 2)
                .cloned()
                .collect();
            for key in evict {
                self.entries.remove(&key);
            }
        }
        self.entries.insert(Self::make_key(text, from, to), translation);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Translates with a terse "translation only" instruction.
///
/// Provider failures and empty output are returned as errors; the caller
/// decides whether to fall back to the original text.
pub struct LlmTranslator {
    model: Arc<dyn LanguageModel>,
    prompts: TranslationPrompts,
    cache: Option<RwLock<TranslationCache>>,
}

impl LlmTranslator {
    pub fn new(model: Arc<dyn LanguageModel>, config: &TranslationConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| RwLock::new(TranslationCache::new(config.cache_size)));

        Self {
            model,
            prompts: config.prompts.clone(),
            cache,
        }
    }

    /// Number of cached translations
    pub fn cached_entries(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.read().len())
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        if from == to || text.trim().is_empty() {
            return Ok(text.to_string());
        }

        if let Some(cache) = &self.cache {
            let cached = cache.read().get(text, from, to);
            if let Some(hit) = cached {
                tracing::trace!(from = %from, to = %to, "Translation cache hit");
                return Ok(hit);
            }
        }

        let request = GenerateRequest::new(self.prompts.for_target(to))
            .with_user(text)
            .with_temperature(sampling::TRANSLATION_TEMPERATURE)
            .with_max_tokens(sampling::TRANSLATION_MAX_TOKENS);

        let translated = self.model.complete(request).await?.trim().to_string();
        if translated.is_empty() {
            return Err(Error::EmptyResponse);
        }

        tracing::debug!(
            from = %from,
            to = %to,
            input_len = text.len(),
            output_len = translated.len(),
            "Translated text"
        );

        if let Some(cache) = &self.cache {
            cache.write().insert(text, from, to, translated.clone());
        }

        Ok(translated)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
