//! Pass-through translator

use async_trait::async_trait;
use support_agent_core::{Language, Result, Translator};

/// Returns text unchanged. Used when no completion model is configured.
#[derive(Debug, Clone, Default)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _from: Language, _to: Language) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough() {
        let translator = NoopTranslator::new();
        assert_eq!(translator.to_arabic("Hello").await.unwrap(), "Hello");
        assert_eq!(translator.to_english("مرحبا").await.unwrap(), "مرحبا");
    }
}
