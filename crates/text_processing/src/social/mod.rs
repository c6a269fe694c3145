//! Social intent matching
//!
//! Classifies purely social messages (greetings, thanks, farewells, short
//! affirmatives, "how are you") and picks a canned reply. Categories are
//! tested in priority order; the first match wins.
//!
//! # Example
//!
//! ```ignore
//! use support_agent_text_processing::social::{SocialIntentMatcher, SocialCategory};
//!
//! let matcher = SocialIntentMatcher::new();
//! let hit = matcher.classify("Hello there!").unwrap();
//! assert_eq!(hit.category, SocialCategory::Greeting);
//! ```

mod lexicon;

use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use support_agent_core::Language;

use lexicon::*;

/// Chooses an index in `0..len` from a reply pool of `len` entries
pub type IndexPicker = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Social message categories, in matching priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialCategory {
    Greeting,
    Thanks,
    Goodbye,
    Affirmative,
    HowAreYou,
}

impl SocialCategory {
    pub const ALL: [SocialCategory; 5] = [
        SocialCategory::Greeting,
        SocialCategory::Thanks,
        SocialCategory::Goodbye,
        SocialCategory::Affirmative,
        SocialCategory::HowAreYou,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialCategory::Greeting => "greeting",
            SocialCategory::Thanks => "thanks",
            SocialCategory::Goodbye => "goodbye",
            SocialCategory::Affirmative => "affirmative",
            SocialCategory::HowAreYou => "how_are_you",
        }
    }
}

/// A classified social message
#[derive(Debug, Clone, PartialEq)]
pub struct SocialMatch {
    pub category: SocialCategory,
    /// Canned English reply
    pub response: String,
    /// Language of the keyword that matched
    pub matched_language: Language,
}

/// Pattern classifier for social messages
pub struct SocialIntentMatcher {
    pools: RwLock<HashMap<SocialCategory, Vec<String>>>,
    picker: IndexPicker,
}

impl SocialIntentMatcher {
    /// Matcher with the default reply pools and a random picker
    pub fn new() -> Self {
        Self::with_picker(Arc::new(|len: usize| rand::thread_rng().gen_range(0..len)))
    }

    /// Matcher with a caller-supplied picker (deterministic in tests)
    pub fn with_picker(picker: IndexPicker) -> Self {
        let owned = |pool: &[&str]| pool.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut pools = HashMap::new();
        pools.insert(SocialCategory::Greeting, owned(GREETING_RESPONSES));
        pools.insert(SocialCategory::Thanks, owned(THANKS_RESPONSES));
        pools.insert(SocialCategory::Goodbye, owned(GOODBYE_RESPONSES));
        pools.insert(SocialCategory::Affirmative, owned(AFFIRMATIVE_RESPONSES));
        pools.insert(SocialCategory::HowAreYou, owned(HOW_ARE_YOU_RESPONSES));

        Self {
            pools: RwLock::new(pools),
            picker,
        }
    }

    /// Append a reply to a category's pool
    pub fn add_response(&self, category: SocialCategory, response: impl Into<String>) {
        self.pools
            .write()
            .entry(category)
            .or_default()
            .push(response.into());
    }

    /// Number of replies in a category's pool
    pub fn pool_size(&self, category: SocialCategory) -> usize {
        self.pools.read().get(&category).map_or(0, Vec::len)
    }

    /// Classify `message`; `None` when it is not purely social
    pub fn classify(&self, message: &str) -> Option<SocialMatch> {
        let clean = normalize(message);
        if clean.is_empty() {
            return None;
        }
        let words: Vec<&str> = clean.split(' ').collect();

        for category in SocialCategory::ALL {
            let matched_language = if matches_arabic(category, &clean, &words) {
                Language::Arabic
            } else if matches_english(category, &clean, &words) {
                Language::English
            } else {
                continue;
            };

            let response = self.pick(category)?;
            tracing::debug!(
                category = category.as_str(),
                matched_language = %matched_language,
                "Social message matched"
            );
            return Some(SocialMatch {
                category,
                response,
                matched_language,
            });
        }

        None
    }

    pub fn is_friendly(&self, message: &str) -> bool {
        self.classify(message).is_some()
    }

    fn pick(&self, category: SocialCategory) -> Option<String> {
        let pools = self.pools.read();
        let pool = pools.get(&category).filter(|p| !p.is_empty())?;
        let index = (self.picker)(pool.len()).min(pool.len() - 1);
        Some(pool[index].clone())
    }
}

impl Default for SocialIntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase, drop sentence punctuation, collapse whitespace
fn normalize(message: &str) -> String {
    let stripped: String = message
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '!' | '?' | '.' | ',' | ';' | ':' | '؟' | '،' | '؛'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn matches_english(category: SocialCategory, clean: &str, words: &[&str]) -> bool {
    match category {
        // single words anywhere, phrases only as the opening of the message
        SocialCategory::Greeting => GREETINGS.iter().any(|g| {
            words.contains(g) || clean == *g || clean.starts_with(&format!("{g} "))
        }),
        SocialCategory::Thanks => THANKS.iter().any(|t| clean.contains(t)),
        SocialCategory::Goodbye => GOODBYES.iter().any(|g| clean.contains(g)),
        SocialCategory::Affirmative => {
            words.len() <= 2 && words.iter().all(|w| AFFIRMATIVES.contains(w))
        }
        SocialCategory::HowAreYou => HOW_ARE_YOU.iter().any(|p| clean.contains(p)),
    }
}

fn matches_arabic(category: SocialCategory, clean: &str, words: &[&str]) -> bool {
    let keywords = match category {
        SocialCategory::Greeting => AR_GREETINGS,
        SocialCategory::Thanks => AR_THANKS,
        SocialCategory::Goodbye => AR_GOODBYES,
        SocialCategory::Affirmative => {
            return words.len() <= 2 && words.iter().all(|w| AR_AFFIRMATIVES.contains(w));
        }
        SocialCategory::HowAreYou => AR_HOW_ARE_YOU,
    };
    keywords.iter().any(|kw| arabic_keyword_hit(kw, clean, words))
}

fn arabic_keyword_hit(keyword: &str, clean: &str, words: &[&str]) -> bool {
    if keyword.contains(' ') {
        return clean.contains(keyword);
    }
    words.iter().any(|w| {
        w.starts_with(keyword)
            || w.strip_prefix('و')
                .map_or(false, |rest| rest.starts_with(keyword))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_pick() -> SocialIntentMatcher {
        SocialIntentMatcher::with_picker(Arc::new(|_: usize| 0))
    }

    fn category(text: &str) -> Option<SocialCategory> {
        first_pick().classify(text).map(|m| m.category)
    }

    #[test]
    fn test_greeting() {
        assert_eq!(category("Hello!"), Some(SocialCategory::Greeting));
        assert_eq!(category("good morning"), Some(SocialCategory::Greeting));
        assert_eq!(category("hey, anyone there?"), Some(SocialCategory::Greeting));
    }

    #[test]
    fn test_greeting_prefix_needs_word_boundary() {
        assert_eq!(category("your prices please"), None);
        assert_eq!(category("history of the company"), None);
    }

    #[test]
    fn test_priority_order() {
        // greeting wins over thanks
        assert_eq!(category("hi, thanks a lot"), Some(SocialCategory::Greeting));
        assert_eq!(category("thanks, bye"), Some(SocialCategory::Thanks));
        assert_eq!(category("see you tomorrow"), Some(SocialCategory::Goodbye));
    }

    #[test]
    fn test_affirmative_only_short_messages() {
        assert_eq!(category("ok"), Some(SocialCategory::Affirmative));
        assert_eq!(category("yes sure"), Some(SocialCategory::Affirmative));
        assert_eq!(category("yes I want to book"), None);
    }

    #[test]
    fn test_how_are_you() {
        let m = first_pick().classify("How are you?").unwrap();
        assert_eq!(m.category, SocialCategory::HowAreYou);
        assert_eq!(
            m.response,
            "I'm doing great, thank you for asking! 😊 How can I help you today?"
        );
    }

    #[test]
    fn test_non_social() {
        assert_eq!(category("what time do you open"), None);
        assert_eq!(category("my order never arrived"), None);
        assert_eq!(category("   "), None);
    }

    #[test]
    fn test_arabic_keywords() {
        let matcher = first_pick();
        let hello = matcher.classify("مرحباً").unwrap();
        assert_eq!(hello.category, SocialCategory::Greeting);
        assert_eq!(hello.matched_language, Language::Arabic);

        assert_eq!(category("شكراً جزيلاً"), Some(SocialCategory::Thanks));
        assert_eq!(category("مع السلامة"), Some(SocialCategory::Goodbye));
        assert_eq!(category("وداعا"), Some(SocialCategory::Goodbye));
        assert_eq!(category("نعم"), Some(SocialCategory::Affirmative));
        // "هاي" inside another word is not a greeting
        assert_eq!(category("نهاية الأسبوع"), None);
    }

    #[test]
    fn test_picker_is_injected() {
        let matcher = SocialIntentMatcher::with_picker(Arc::new(|len: usize| len - 1));
        let m = matcher.classify("thanks").unwrap();
        assert_eq!(
            m.response,
            "I'm happy I could help! Don't hesitate to reach out again! 💙"
        );
        assert_eq!(m.matched_language, Language::English);
    }

    #[test]
    fn test_out_of_range_pick_is_clamped() {
        let matcher = SocialIntentMatcher::with_picker(Arc::new(|_: usize| 99));
        assert!(matcher.classify("bye").is_some());
    }

    #[test]
    fn test_pools_are_appendable() {
        let matcher = SocialIntentMatcher::with_picker(Arc::new(|len: usize| len - 1));
        assert_eq!(matcher.pool_size(SocialCategory::Greeting), 5);

        matcher.add_response(SocialCategory::Greeting, "Welcome back!");
        assert_eq!(matcher.pool_size(SocialCategory::Greeting), 6);
        assert_eq!(matcher.classify("hi").unwrap().response, "Welcome back!");
    }

    #[test]
    fn test_default_matcher_picks_from_pool() {
        let matcher = SocialIntentMatcher::new();
        let reply = matcher.classify("hello").unwrap().response;
        assert!(GREETING_RESPONSES.contains(&reply.as_str()));
    }
}
