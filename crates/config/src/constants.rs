//! Centralized constants for the support agent
//!
//! Single source of truth for thresholds, endpoints and timeouts. Values
//! that deployments may tune are mirrored as defaults in [`crate::settings`].

/// Decision thresholds used by the dialogue pipeline
pub mod thresholds {
    /// Fraction of Arabic-block characters above which text is Arabic.
    /// Strictly greater than: exactly 0.30 is English.
    pub const ARABIC_RATIO: f32 = 0.30;

    /// Minimum relevance confidence (0-100) to attempt an answer
    pub const RELEVANCE_MIN_CONFIDENCE: u8 = 30;

    /// Share of long query words that must fuzzy-match a stored question
    pub const DIRECT_ANSWER_WORD_RATIO: f32 = 0.7;

    /// Query words must be longer than this to count as search terms
    pub const MIN_TERM_LEN: usize = 3;

    /// Retrieved context must be longer than this for the schedule fast path
    pub const DIRECT_CONTEXT_MIN_LEN: usize = 50;

    /// Clarifying attempts before escalation
    pub const MAX_ASSISTANCE_ATTEMPTS: u32 = 2;
}

/// Knowledge retrieval limits
pub mod retrieval {
    /// Score for the full query appearing verbatim in an entry
    pub const EXACT_MATCH_SCORE: u32 = 100;

    /// Score per query term found in an entry
    pub const TERM_MATCH_SCORE: u32 = 10;

    /// Entries kept after scoring
    pub const TOP_K: usize = 5;

    /// Entries used when nothing scores
    pub const FALLBACK_ENTRIES: usize = 3;

    /// Default context length in characters
    pub const CONTEXT_MAX_LENGTH: usize = 3000;

    /// Raw knowledge excerpt sent with relevance checks, in characters
    pub const RELEVANCE_EXCERPT_LENGTH: usize = 2000;
}

/// Conversation limits
pub mod limits {
    /// Prior turns sent with answer generation
    pub const HISTORY_WINDOW: usize = 6;

    /// Turns retained per session
    pub const MAX_HISTORY_TURNS: usize = 50;

    /// Ticket delivery attempts (first try plus user-initiated retries)
    pub const MAX_DELIVERY_ATTEMPTS: u32 = 3;

    /// Error bodies are truncated to this many characters
    pub const MAX_ERROR_BODY_LEN: usize = 200;
}

/// Sampling parameters per call site
pub mod sampling {
    pub const ANSWER_TEMPERATURE: f32 = 0.7;
    pub const ANSWER_MAX_TOKENS: u32 = 500;

    pub const RELEVANCE_TEMPERATURE: f32 = 0.3;
    pub const RELEVANCE_MAX_TOKENS: u32 = 200;

    pub const ASSISTANCE_TEMPERATURE: f32 = 0.7;
    pub const ASSISTANCE_MAX_TOKENS: u32 = 300;

    pub const TRANSLATION_TEMPERATURE: f32 = 0.3;
    pub const TRANSLATION_MAX_TOKENS: u32 = 300;
}

/// Service endpoints
pub mod endpoints {
    /// OpenAI-compatible chat completions base URL
    pub const OPENROUTER_DEFAULT: &str = "https://openrouter.ai/api/v1";

    /// Default completion model
    pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

    /// Telegram Bot API
    pub const TELEGRAM_API: &str = "https://api.telegram.org";

    /// Google Sheets values API
    pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

    /// Default sheet range
    pub const SHEETS_DEFAULT_RANGE: &str = "Sheet1";
}

/// Timeouts (in milliseconds unless noted)
pub mod timeouts {
    /// Completion request timeout (ms)
    pub const LLM_REQUEST_MS: u64 = 30_000;

    /// Ticket delivery timeout (ms)
    pub const DELIVERY_MS: u64 = 15_000;

    /// Knowledge source fetch timeout (ms)
    pub const KNOWLEDGE_FETCH_MS: u64 = 15_000;

    /// HTTP request timeout for the server (seconds). Covers a worst-case
    /// turn: four completions plus one delivery.
    pub const HTTP_REQUEST_SECS: u64 = 150;

    /// Most sequential completions in one turn: query translation,
    /// relevance, answer or clarification, reply translation
    pub const COMPLETIONS_PER_TURN: u64 = 4;
}

/// Cache settings
pub mod cache {
    /// Knowledge source cache TTL (seconds)
    pub const KNOWLEDGE_TTL_SECS: u64 = 300;

    /// Knowledge refresh interval (seconds)
    pub const KNOWLEDGE_REFRESH_SECS: u64 = 300;

    /// Translation cache entries
    pub const TRANSLATION_CACHE_SIZE: usize = 1000;

    /// Sessions idle longer than this are evicted (seconds)
    pub const SESSION_IDLE_TTL_SECS: u64 = 3600;
}
