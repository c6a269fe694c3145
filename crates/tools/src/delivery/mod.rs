//! Ticket delivery channels
//!
//! # Example
//!
//! ```ignore
//! let delivery = create_ticket_delivery(&settings.delivery)?;
//! match delivery {
//!     Some(channel) => channel.deliver(&ticket).await?,
//!     None => { /* escalate to the support email instead */ }
//! }
//! ```

mod log;
mod telegram;

pub use log::LogDelivery;
pub use telegram::{escape_html, format_ticket_message, TelegramConfig, TelegramDelivery};

use std::sync::Arc;

use support_agent_config::{DeliveryConfig, DeliveryProvider};
use support_agent_core::{Result, TicketDelivery};

/// Build the configured delivery channel; `None` when delivery is disabled
pub fn create_ticket_delivery(config: &DeliveryConfig) -> Result<Option<Arc<dyn TicketDelivery>>> {
    match config.provider {
        DeliveryProvider::Telegram => {
            tracing::info!(chat_id = %config.chat_id, "Ticket delivery via Telegram");
            Ok(Some(Arc::new(TelegramDelivery::new(TelegramConfig::from(config))?)))
        }
        DeliveryProvider::Log => {
            tracing::info!("Ticket delivery to log only");
            Ok(Some(Arc::new(LogDelivery::new())))
        }
        DeliveryProvider::Disabled => {
            tracing::warn!(
                support_email = %config.support_email,
                "Ticket delivery disabled; escalations point to support email"
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use support_agent_core::SupportTicket;

    #[test]
    fn test_factory() {
        let config = DeliveryConfig {
            provider: DeliveryProvider::Disabled,
            ..Default::default()
        };
        assert!(create_ticket_delivery(&config).unwrap().is_none());

        let log = create_ticket_delivery(&DeliveryConfig::default()).unwrap().unwrap();
        assert_eq!(log.name(), "log");

        let config = DeliveryConfig {
            provider: DeliveryProvider::Telegram,
            bot_token: "t".into(),
            chat_id: "-1".into(),
            ..Default::default()
        };
        assert_eq!(create_ticket_delivery(&config).unwrap().unwrap().name(), "telegram");
    }

    #[tokio::test]
    async fn test_log_delivery_accepts() {
        let ticket = SupportTicket::new("Jane Doe", "jane@example.com", "N/A", "It is broken badly");
        assert!(LogDelivery::new().deliver(&ticket).await.is_ok());
    }
}
