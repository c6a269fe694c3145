use async_trait::async_trait;

use support_agent_core::{Result, SupportTicket, TicketDelivery};

/// Writes tickets to the structured log and always succeeds
#[derive(Debug, Default)]
pub struct LogDelivery;

impl LogDelivery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TicketDelivery for LogDelivery {
    async fn deliver(&self, ticket: &SupportTicket) -> Result<()> {
        tracing::info!(
            ticket = ticket.id(),
            name = ticket.name(),
            email = ticket.email(),
            customer_number = ticket.customer_number(),
            problem = ticket.problem(),
            submitted = %ticket.timestamp(),
            "Support ticket received"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
