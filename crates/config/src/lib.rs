//! Configuration for the support agent
//!
//! - [`settings`]: layered runtime settings (defaults, files, environment)
//! - [`constants`]: fixed thresholds, endpoints and timeouts
//! - [`prompts`]: system prompts and fixed agent messages

pub mod constants;
pub mod prompts;
pub mod settings;

pub use prompts::{
    AgentMessages, AnswerPrompt, ArabicPhrases, AssistancePrompts, PromptTemplates,
    RelevancePrompt, TranslationPrompts,
};
pub use settings::{
    AgentConfig, ConfigError, DeliveryConfig, DeliveryProvider, KnowledgeConfig,
    KnowledgeProvider, LlmConfig, ServerConfig, Settings,
};
