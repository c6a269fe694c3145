//! Text processing for the bilingual support agent
//!
//! - [`translation`]: script-based language detection and English/Arabic
//!   translation through the completion capability
//! - [`social`]: greeting/thanks/farewell classification with canned replies

pub mod social;
pub mod translation;

pub use social::{IndexPicker, SocialCategory, SocialIntentMatcher, SocialMatch};
pub use translation::{
    create_translator, LanguageDetector, LlmTranslator, NoopTranslator, TranslationConfig,
    TranslationProvider,
};
