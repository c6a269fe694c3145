//! Translation module with script detection
//!
//! Supports the translate-search-translate pattern: Arabic queries are
//! searched in English and replies are translated back.

mod detect;
mod llm;
mod noop;

pub use detect::LanguageDetector;
pub use llm::LlmTranslator;
pub use noop::NoopTranslator;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use support_agent_config::constants::cache;
use support_agent_config::TranslationPrompts;
use support_agent_core::{LanguageModel, Translator};

/// Translation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Which provider to use
    pub provider: TranslationProvider,
    /// Cache translated strings in memory
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    /// Max cache entries
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    /// Translation instructions
    #[serde(default)]
    pub prompts: TranslationPrompts,
}

fn default_true() -> bool {
    true
}

fn default_cache_size() -> usize {
    cache::TRANSLATION_CACHE_SIZE
}

/// Translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Translate through the completion capability
    #[default]
    Llm,
    /// Disabled (pass-through)
    Disabled,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::Llm,
            cache_enabled: true,
            cache_size: default_cache_size(),
            prompts: TranslationPrompts::default(),
        }
    }
}

/// Create translator based on config
pub fn create_translator(
    config: &TranslationConfig,
    model: Option<Arc<dyn LanguageModel>>,
) -> Arc<dyn Translator> {
    match (config.provider, model) {
        (TranslationProvider::Llm, Some(model)) => {
            tracing::info!(
                model = model.model_name(),
                cache = config.cache_enabled,
                "Using completion-backed translator"
            );
            Arc::new(LlmTranslator::new(model, config))
        }
        (TranslationProvider::Llm, None) => {
            tracing::warn!("No completion model available, translation disabled");
            Arc::new(NoopTranslator::new())
        }
        (TranslationProvider::Disabled, _) => Arc::new(NoopTranslator::new()),
    }
}
