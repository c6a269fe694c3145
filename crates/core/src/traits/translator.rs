//! Translation capability

use async_trait::async_trait;

use crate::{Language, Result};

/// Translator between the supported languages.
///
/// Failures are returned, never hidden; callers decide whether to fall back
/// to the untranslated text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `from` to `to`
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Provider name, for logs
    fn name(&self) -> &str;

    async fn to_arabic(&self, text: &str) -> Result<String> {
        self.translate(text, Language::English, Language::Arabic).await
    }

    async fn to_english(&self, text: &str) -> Result<String> {
        self.translate(text, Language::Arabic, Language::English).await
    }
}
