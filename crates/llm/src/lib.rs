//! Language model integration
//!
//! Provides [`ChatCompletionClient`], a `LanguageModel` backed by any
//! OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default).
//!
//! # Example
//!
//! ```ignore
//! use support_agent_llm::{ChatCompletionClient, ChatCompletionConfig};
//! use support_agent_core::{GenerateRequest, LanguageModel};
//!
//! let client = ChatCompletionClient::new(ChatCompletionConfig::from(&settings.llm))?;
//! let text = client
//!     .complete(GenerateRequest::new("Be brief.").with_user("Hello"))
//!     .await?;
//! ```

mod client;

pub use client::{ChatCompletionClient, ChatCompletionConfig};
