//! Telegram bot delivery
//!
//! Posts each ticket to a group chat through the Bot API `sendMessage` call
//! with HTML formatting.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use support_agent_config::constants::{endpoints, timeouts};
use support_agent_config::DeliveryConfig;
use support_agent_core::{Error, Result, SupportTicket, TicketDelivery};

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API base, without trailing slash
    pub api_base: String,
    pub bot_token: String,
    /// Target chat; group ids are negative
    pub chat_id: String,
    pub timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: endpoints::TELEGRAM_API.to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
            timeout: Duration::from_millis(timeouts::DELIVERY_MS),
        }
    }
}

impl From<&DeliveryConfig> for TelegramConfig {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            ..Default::default()
        }
    }
}

/// Bot API envelope
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

pub struct TelegramDelivery {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramDelivery {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Delivery(format!("http client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// Check the token with `getMe`; returns the bot's username
    pub async fn test_connection(&self) -> Result<String> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = read_envelope(response).await?;

        let username = body
            .result
            .as_ref()
            .and_then(|r| r.get("username"))
            .and_then(|u| u.as_str())
            .unwrap_or_default()
            .to_string();
        tracing::info!(bot = %username, "Telegram bot connected");
        Ok(username)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            // reqwest errors carry the URL, which contains the token
            Error::Delivery(e.without_url().to_string())
        }
    }
}

async fn read_envelope(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status();
    let body: Option<ApiResponse> = response.json().await.ok();

    match body {
        Some(body) if status.is_success() && body.ok => Ok(body),
        Some(body) => Err(Error::Delivery(format!(
            "telegram HTTP {}: {}",
            status.as_u16(),
            body.description.unwrap_or_default()
        ))),
        None => Err(Error::Delivery(format!(
            "telegram HTTP {}: unreadable response",
            status.as_u16()
        ))),
    }
}

/// Escape the characters Telegram's HTML mode treats as markup
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML message body for a ticket
pub fn format_ticket_message(ticket: &SupportTicket) -> String {
    format!(
        "🎫 <b>NEW SUPPORT TICKET</b>\n\
         \n\
         🆔 <b>Ticket:</b> {}\n\
         \n\
         👤 <b>Customer Information:</b>\n\
         • Name: {}\n\
         • Email: {}\n\
         • Customer #: {}\n\
         \n\
         📝 <b>Problem Description:</b>\n\
         {}\n\
         \n\
         🕐 <b>Submitted:</b> {}\n\
         \n\
         ━━━━━━━━━━━━━━━━━━━━\n\
         <i>Sent via support chat</i>",
        escape_html(ticket.id()),
        escape_html(ticket.name()),
        escape_html(ticket.email()),
        escape_html(ticket.customer_number()),
        escape_html(ticket.problem()),
        ticket.timestamp().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    )
}

#[async_trait]
impl TicketDelivery for TelegramDelivery {
    async fn deliver(&self, ticket: &SupportTicket) -> Result<()> {
        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": format_ticket_message(ticket),
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if let Err(e) = read_envelope(response).await {
            tracing::error!(ticket = ticket.id(), error = %e, "Telegram rejected ticket");
            return Err(e);
        }

        tracing::info!(ticket = ticket.id(), "Ticket sent to Telegram");
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
