//! Chat completions over HTTP

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use support_agent_config::constants::{endpoints, limits, timeouts};
use support_agent_config::LlmConfig;
use support_agent_core::{Error, GenerateRequest, LanguageModel, Result};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Optional `HTTP-Referer` header (OpenRouter attribution)
    pub referer: Option<String>,
    /// Optional `X-Title` header (OpenRouter attribution)
    pub title: Option<String>,
    pub timeout: Duration,
}

impl Default for ChatCompletionConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::OPENROUTER_DEFAULT.to_string(),
            api_key: String::new(),
            model: endpoints::DEFAULT_MODEL.to_string(),
            referer: None,
            title: None,
            timeout: Duration::from_millis(timeouts::LLM_REQUEST_MS),
        }
    }
}

impl From<&LlmConfig> for ChatCompletionConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            referer: config.referer.clone().filter(|r| !r.is_empty()),
            title: config.title.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completion client
pub struct ChatCompletionClient {
    client: reqwest::Client,
    config: ChatCompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(config: ChatCompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_body<'a>(&'a self, request: &'a GenerateRequest) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: &request.system_prompt,
        });
        messages.extend(request.messages.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));

        ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    /// Extract trimmed content of the first choice
    fn parse_response(response: ChatCompletionResponse) -> Result<String> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(content)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            Error::Provider(format!("request failed: {err}"))
        }
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    async fn complete(&self, request: GenerateRequest) -> Result<String> {
        let started = Instant::now();
        let body = self.build_body(&request);

        let mut http = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body);
        if let Some(referer) = &self.config.referer {
            http = http.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            http = http.header("X-Title", title);
        }

        let response = http.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(
                model = %self.config.model,
                status = status.as_u16(),
                "Completion request rejected"
            );
            return Err(map_http_error(status.as_u16(), &text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("invalid response body: {e}")))?;
        let content = Self::parse_response(parsed)?;

        let elapsed = started.elapsed();
        metrics::histogram!("support_agent_completion_seconds").record(elapsed.as_secs_f64());
        tracing::debug!(
            model = %self.config.model,
            latency_ms = elapsed.as_millis() as u64,
            messages = request.messages.len(),
            response_len = content.len(),
            "Completion succeeded"
        );

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ── HTTP error mapping ────────────────────────────────────────────────────────

fn map_http_error(status: u16, body: &str) -> Error {
    // char-based truncation; byte slicing could split a UTF-8 sequence
    let safe_body = if body.chars().count() > limits::MAX_ERROR_BODY_LEN {
        let truncated: String = body.chars().take(limits::MAX_ERROR_BODY_LEN).collect();
        format!("{truncated}…[truncated]")
    } else {
        body.to_string()
    };

    match status {
        401 => Error::Provider("unauthorized: check the completion API key".to_string()),
        429 => Error::Provider("rate limited by completion provider".to_string()),
        s if s >= 500 => Error::Provider(format!("provider server error {s}: {safe_body}")),
        s => Error::Provider(format!("HTTP {s}: {safe_body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use support_agent_core::ConversationTurn;

    fn client() -> ChatCompletionClient {
        ChatCompletionClient::new(ChatCompletionConfig {
            base_url: "https://llm.test/api/v1/".into(),
            api_key: "key".into(),
            model: "test-model".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(client().endpoint(), "https://llm.test/api/v1/chat/completions");
    }

    #[test]
    fn test_body_puts_system_first() {
        let client = client();
        let request = GenerateRequest::new("be brief")
            .with_history(&[ConversationTurn::assistant("earlier")])
            .with_user("hours?")
            .with_temperature(0.3)
            .with_max_tokens(200);

        let body = serde_json::to_value(client.build_body(&request)).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 200);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][2]["content"], "hours?");
    }

    #[test]
    fn test_parse_first_choice() {
        let raw = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  9am-5pm \n"}}]
        });
        let parsed: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(ChatCompletionClient::parse_response(parsed).unwrap(), "9am-5pm");
    }

    #[test]
    fn test_parse_missing_content_is_empty_response() {
        for raw in [
            serde_json::json!({"choices": []}),
            serde_json::json!({"choices": [{"message": {"content": "   "}}]}),
            serde_json::json!({"choices": [{"message": null}]}),
            serde_json::json!({}),
        ] {
            let parsed: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
            assert!(matches!(
                ChatCompletionClient::parse_response(parsed),
                Err(Error::EmptyResponse)
            ));
        }
    }

    #[test]
    fn test_map_http_error_truncates_body() {
        let body = "é".repeat(500);
        match map_http_error(502, &body) {
            Error::Provider(msg) => {
                assert!(msg.contains("[truncated]"));
                assert!(msg.chars().count() < 260);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_statuses() {
        assert!(matches!(map_http_error(401, ""), Error::Provider(m) if m.contains("unauthorized")));
        assert!(matches!(map_http_error(429, ""), Error::Provider(m) if m.contains("rate limited")));
        assert!(matches!(map_http_error(404, "nope"), Error::Provider(m) if m == "HTTP 404: nope"));
    }
}
