//! Outbound integrations for the support agent
//!
//! Currently ticket delivery: a chat-bot channel for the support team and a
//! log-only channel for development.

pub mod delivery;

pub use delivery::{create_ticket_delivery, LogDelivery, TelegramConfig, TelegramDelivery};
