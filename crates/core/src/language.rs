//! Supported conversation languages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the agent converses in. Search and prompting happen in English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Parse from an ISO code, case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "ar" | "arabic" => Some(Language::Arabic),
            _ => None,
        }
    }

    /// English display name, used inside prompts
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }

    pub fn is_arabic(&self) -> bool {
        matches!(self, Language::Arabic)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of classifying an utterance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub language: Language,
    /// 0..=100
    pub confidence: f32,
}

impl LanguageDetection {
    /// Soft failure value for empty input
    pub fn unknown() -> Self {
        Self {
            language: Language::English,
            confidence: 0.0,
        }
    }
}
