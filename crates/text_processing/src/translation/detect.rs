//! Script-based language detection
//!
//! Counts grapheme clusters rather than code points, so composed and
//! decomposed spellings of the same text (NFC/NFD) classify identically.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use support_agent_config::constants::thresholds;
use support_agent_core::{Language, LanguageDetection};

static IGNORED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\d\p{P}]").unwrap());

/// Classifies text as English or Arabic by character distribution
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    threshold: f32,
}

impl LanguageDetector {
    pub fn new() -> Self {
        Self {
            threshold: thresholds::ARABIC_RATIO,
        }
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Detect the language of `text`.
    ///
    /// Arabic when the Arabic share of the remaining characters is strictly
    /// above the threshold. Empty input yields English with confidence 0.
    pub fn detect(&self, text: &str) -> LanguageDetection {
        let ratio = match Self::arabic_ratio(text) {
            Some(r) => r,
            None => return LanguageDetection::unknown(),
        };

        if ratio > self.threshold {
            LanguageDetection {
                language: Language::Arabic,
                confidence: (ratio * 100.0).min(100.0),
            }
        } else {
            LanguageDetection {
                language: Language::English,
                confidence: ((1.0 - ratio) * 100.0).min(100.0),
            }
        }
    }

    pub fn is_arabic(&self, text: &str) -> bool {
        self.detect(text).language == Language::Arabic
    }

    /// Share of Arabic graphemes after dropping whitespace, digits and
    /// punctuation; `None` when nothing remains
    pub fn arabic_ratio(text: &str) -> Option<f32> {
        let cleaned = IGNORED.replace_all(text, "");
        let mut total = 0usize;
        let mut arabic = 0usize;

        for grapheme in cleaned.graphemes(true) {
            total += 1;
            if grapheme.chars().next().map_or(false, is_arabic_char) {
                arabic += 1;
            }
        }

        if total == 0 {
            None
        } else {
            Some(arabic as f32 / total as f32)
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Arabic block, Arabic Supplement and the presentation-form blocks
fn is_arabic_char(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english() {
        let d = LanguageDetector::new().detect("What are your opening hours?");
        assert_eq!(d.language, Language::English);
        assert!((d.confidence - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_arabic() {
        let d = LanguageDetector::new().detect("ما هي ساعات العمل؟");
        assert_eq!(d.language, Language::Arabic);
        assert!((d.confidence - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_fails_soft() {
        let detector = LanguageDetector::new();
        for text in ["", "   ", "123 456", "?!..."] {
            let d = detector.detect(text);
            assert_eq!(d.language, Language::English);
            assert_eq!(d.confidence, 0.0);
        }
    }

    #[test]
    fn test_exactly_thirty_percent_is_english() {
        // 3 Arabic letters out of 10
        let d = LanguageDetector::new().detect("abcdefg سلم");
        assert_eq!(d.language, Language::English);
        assert!((d.confidence - 70.0).abs() < 0.01);
    }

    #[test]
    fn test_just_above_thirty_percent_is_arabic() {
        // 4 Arabic letters out of 13 (~30.8%)
        let d = LanguageDetector::new().detect("abcdefghi سلام");
        assert_eq!(d.language, Language::Arabic);
        assert!(d.confidence > 30.0 && d.confidence < 31.0);
    }

    #[test]
    fn test_digits_and_punctuation_ignored() {
        let detector = LanguageDetector::new();
        assert!(detector.is_arabic("مرحبا 12345 !!! ..."));
        assert!(detector.is_arabic("رقم ٣٤٥٦٧٨٩"));
    }

    #[test]
    fn test_stable_across_normalization_forms() {
        let detector = LanguageDetector::new();
        let composed = detector.detect("café مرحبا");
        let decomposed = detector.detect("cafe\u{0301} مرحبا");
        assert_eq!(composed, decomposed);

        // alef with hamza above, precomposed vs. alef + combining hamza
        let precomposed = detector.detect("\u{0623}hello");
        let combining = detector.detect("\u{0627}\u{0654}hello");
        assert_eq!(precomposed, combining);
    }

    #[test]
    fn test_presentation_forms_count_as_arabic() {
        // lam-alef ligature presentation forms
        assert!(LanguageDetector::new().is_arabic("\u{FEFB}\u{FEF7}"));
    }
}
