//! Support ticket produced by the intake flow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fully populated ticket. Constructed once per successful intake flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    id: String,
    name: String,
    email: String,
    customer_number: String,
    problem: String,
    timestamp: DateTime<Utc>,
}

impl SupportTicket {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        customer_number: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let id = format!(
            "TKT-{}",
            uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );
        Self {
            id,
            name: name.into(),
            email: email.into(),
            customer_number: customer_number.into(),
            problem: problem.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn customer_number(&self) -> &str {
        &self.customer_number
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_id_format() {
        let ticket = SupportTicket::new("John Smith", "john@example.com", "N/A", "Cannot log in to my account");
        assert!(ticket.id().starts_with("TKT-"));
        assert_eq!(ticket.id().len(), 12);
        assert_eq!(ticket.customer_number(), "N/A");
    }
}
