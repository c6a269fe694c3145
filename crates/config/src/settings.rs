//! Layered application settings
//!
//! Precedence (lowest first): built-in defaults, `config/default.toml`,
//! the file named by `SUPPORT_AGENT_CONFIG`, then `SUPPORT_AGENT__*`
//! environment variables (`SUPPORT_AGENT__LLM__API_KEY`, ...).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::constants::{cache, endpoints, limits, retrieval, thresholds, timeouts};
use crate::prompts::PromptTemplates;

/// Environment variable naming an extra config file
pub const CONFIG_PATH_ENV: &str = "SUPPORT_AGENT_CONFIG";

/// Environment prefix for overrides
pub const ENV_PREFIX: &str = "SUPPORT_AGENT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for support_agent_core::Error {
    fn from(err: ConfigError) -> Self {
        support_agent_core::Error::Config(err.to_string())
    }
}

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub prompts: PromptTemplates,
}

impl Settings {
    /// Load from defaults, optional files and environment
    pub fn load() -> Result<Self, ConfigError> {
        let extra = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(Path::new("config/default.toml"), extra.as_deref().map(Path::new))
    }

    /// Load with explicit file locations; missing files are skipped
    pub fn load_from(base: &Path, extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(base).required(false));

        if let Some(path) = extra {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        tracing::debug!(
            llm_model = %settings.llm.model,
            knowledge = ?settings.knowledge.provider,
            delivery = ?settings.delivery.provider,
            "Settings loaded"
        );

        Ok(settings)
    }

    /// Reject configurations that cannot run
    /// Longest a single turn can take when every provider call runs to its
    /// timeout
    pub fn worst_case_turn_ms(&self) -> u64 {
        timeouts::COMPLETIONS_PER_TURN * self.llm.timeout_ms + self.delivery.timeout_ms
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.agent.history_window == 0 {
            return Err(ConfigError::Invalid("agent.history_window must be non-zero".into()));
        }
        if self.agent.max_assistance_attempts == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_assistance_attempts must be at least 1".into(),
            ));
        }
        if self.agent.relevance_min_confidence > 100 {
            return Err(ConfigError::Invalid(
                "agent.relevance_min_confidence must be within 0-100".into(),
            ));
        }

        let worst_turn_ms = self.worst_case_turn_ms();
        if self.server.request_timeout_secs.saturating_mul(1000) < worst_turn_ms {
            return Err(ConfigError::Invalid(format!(
                "server.request_timeout_secs must cover a full turn ({} ms)",
                worst_turn_ms
            )));
        }

        match self.knowledge.provider {
            KnowledgeProvider::Sheets => {
                if self.knowledge.sheet_id.is_empty() || self.knowledge.api_key.is_empty() {
                    return Err(ConfigError::Invalid(
                        "knowledge.sheet_id and knowledge.api_key are required for the sheets provider".into(),
                    ));
                }
            }
            KnowledgeProvider::File => {
                if self.knowledge.file_path.is_empty() {
                    return Err(ConfigError::Invalid(
                        "knowledge.file_path is required for the file provider".into(),
                    ));
                }
            }
        }

        if self.delivery.provider == DeliveryProvider::Telegram
            && (self.delivery.bot_token.is_empty() || self.delivery.chat_id.is_empty())
        {
            return Err(ConfigError::Invalid(
                "delivery.bot_token and delivery.chat_id are required for telegram delivery".into(),
            ));
        }

        Ok(())
    }
}

/// HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    timeouts::HTTP_REQUEST_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: Vec::new(),
            json_logs: false,
        }
    }
}

/// Completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Sent as `HTTP-Referer`
    #[serde(default)]
    pub referer: Option<String>,
    /// Sent as `X-Title`
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_ms: u64,
    /// Cache translations in memory
    #[serde(default = "default_true")]
    pub translation_cache: bool,
}

fn default_llm_base_url() -> String {
    endpoints::OPENROUTER_DEFAULT.to_string()
}

fn default_model() -> String {
    endpoints::DEFAULT_MODEL.to_string()
}

fn default_llm_timeout() -> u64 {
    timeouts::LLM_REQUEST_MS
}

fn default_true() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: String::new(),
            model: default_model(),
            referer: None,
            title: None,
            timeout_ms: default_llm_timeout(),
            translation_cache: true,
        }
    }
}

/// Knowledge source kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeProvider {
    /// Google Sheets values API
    #[default]
    Sheets,
    /// Local JSON/YAML file
    File,
}

/// Knowledge base source and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub provider: KnowledgeProvider,
    #[serde(default)]
    pub sheet_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Zero disables periodic refresh
    #[serde(default = "default_refresh")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_context_max")]
    pub context_max_length: usize,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
}

fn default_range() -> String {
    endpoints::SHEETS_DEFAULT_RANGE.to_string()
}

fn default_cache_ttl() -> u64 {
    cache::KNOWLEDGE_TTL_SECS
}

fn default_refresh() -> u64 {
    cache::KNOWLEDGE_REFRESH_SECS
}

fn default_context_max() -> usize {
    retrieval::CONTEXT_MAX_LENGTH
}

fn default_fetch_timeout() -> u64 {
    timeouts::KNOWLEDGE_FETCH_MS
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            provider: KnowledgeProvider::default(),
            sheet_id: String::new(),
            api_key: String::new(),
            range: default_range(),
            file_path: String::new(),
            cache_ttl_secs: default_cache_ttl(),
            refresh_interval_secs: default_refresh(),
            context_max_length: default_context_max(),
            fetch_timeout_ms: default_fetch_timeout(),
        }
    }
}

/// Ticket delivery channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryProvider {
    Telegram,
    /// Write tickets to the log only
    #[default]
    Log,
    /// No ticket flow; escalation points at the support email
    Disabled,
}

/// Ticket delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub provider: DeliveryProvider,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default = "default_support_email")]
    pub support_email: String,
    #[serde(default = "default_delivery_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delivery_timeout")]
    pub timeout_ms: u64,
}

fn default_support_email() -> String {
    "support@example.com".to_string()
}

fn default_delivery_attempts() -> u32 {
    limits::MAX_DELIVERY_ATTEMPTS
}

fn default_delivery_timeout() -> u64 {
    timeouts::DELIVERY_MS
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            provider: DeliveryProvider::default(),
            bot_token: String::new(),
            chat_id: String::new(),
            support_email: default_support_email(),
            max_attempts: default_delivery_attempts(),
            timeout_ms: default_delivery_timeout(),
        }
    }
}

/// Dialogue behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_max_attempts")]
    pub max_assistance_attempts: u32,
    #[serde(default = "default_min_confidence")]
    pub relevance_min_confidence: u8,
    /// Prior turns sent with answer generation
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Turns retained per session
    #[serde(default = "default_max_history")]
    pub max_history_turns: usize,
    #[serde(default = "default_direct_context_min")]
    pub direct_context_min_len: usize,
    #[serde(default = "default_session_ttl")]
    pub session_idle_ttl_secs: u64,
}

fn default_max_attempts() -> u32 {
    thresholds::MAX_ASSISTANCE_ATTEMPTS
}

fn default_min_confidence() -> u8 {
    thresholds::RELEVANCE_MIN_CONFIDENCE
}

fn default_history_window() -> usize {
    limits::HISTORY_WINDOW
}

fn default_max_history() -> usize {
    limits::MAX_HISTORY_TURNS
}

fn default_direct_context_min() -> usize {
    thresholds::DIRECT_CONTEXT_MIN_LEN
}

fn default_session_ttl() -> u64 {
    cache::SESSION_IDLE_TTL_SECS
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_assistance_attempts: default_max_attempts(),
            relevance_min_confidence: default_min_confidence(),
            history_window: default_history_window(),
            max_history_turns: default_max_history(),
            direct_context_min_len: default_direct_context_min(),
            session_idle_ttl_secs: default_session_ttl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_settings() -> Settings {
        let mut settings = Settings::default();
        settings.knowledge.provider = KnowledgeProvider::File;
        settings.knowledge.file_path = "knowledge.json".into();
        settings
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent.max_assistance_attempts, 2);
        assert_eq!(settings.agent.relevance_min_confidence, 30);
        assert_eq!(settings.agent.history_window, 6);
        assert_eq!(settings.llm.model, "deepseek/deepseek-chat-v3.1:free");
        assert_eq!(settings.delivery.provider, DeliveryProvider::Log);
    }

    #[test]
    fn test_sheets_provider_requires_credentials() {
        let settings = Settings::default();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
        assert!(file_settings().validate().is_ok());
    }

    #[test]
    fn test_telegram_requires_token() {
        let mut settings = file_settings();
        settings.delivery.provider = DeliveryProvider::Telegram;
        assert!(settings.validate().is_err());

        settings.delivery.bot_token = "123:abc".into();
        settings.delivery.chat_id = "-100".into();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_covers_slowest_turn() {
        let mut settings = file_settings();
        assert_eq!(settings.worst_case_turn_ms(), 135_000);
        assert!(settings.validate().is_ok());

        settings.server.request_timeout_secs = 90;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        settings.llm.timeout_ms = 15_000;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[knowledge]
provider = "file"
file_path = "kb.json"

[agent]
max_assistance_attempts = 3

[prompts.messages]
loading = "Warming up"
escalation = "Passing you to a human."
direct_contact = "Mail {{email}}"
answer_fallback = "Try again."
"#
        )
        .unwrap();

        let settings =
            Settings::load_from(Path::new("does/not/exist.toml"), Some(file.path())).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.knowledge.provider, KnowledgeProvider::File);
        assert_eq!(settings.agent.max_assistance_attempts, 3);
        assert_eq!(settings.agent.history_window, 6);
        assert_eq!(settings.prompts.messages.loading, "Warming up");
        assert_eq!(settings.prompts.messages.direct_contact("a@b.co"), "Mail a@b.co");
    }
}
