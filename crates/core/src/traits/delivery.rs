//! Ticket delivery channel

use async_trait::async_trait;

use crate::{Result, SupportTicket};

/// Hands a finished ticket to a human-facing channel.
///
/// Returns `Error::Delivery` when the channel did not accept the ticket.
#[async_trait]
pub trait TicketDelivery: Send + Sync {
    async fn deliver(&self, ticket: &SupportTicket) -> Result<()>;

    /// Channel name, for logs
    fn name(&self) -> &str;
}
