//! Support ticket intake
//!
//! A strictly forward state machine collecting name, email, customer number
//! and problem description, then handing the finished ticket to a delivery
//! channel:
//!
//! ```text
//! idle → collect_name → collect_email → collect_customer_number
//!      → collect_problem → submitting → completed
//! ```
//!
//! A rejected input re-prompts and leaves the step unchanged. The machine is
//! active exactly while it is between `idle` and `completed`.
//!
//! # Example
//!
//! ```ignore
//! let mut flow = TicketIntakeMachine::new(delivery, IntakeConfig::default());
//! let prompt = flow.start_ticket_flow();
//!
//! let outcome = flow.process_input("Jane Doe").await?;
//! assert!(matches!(outcome, StepOutcome::Advanced(_)));
//! assert_eq!(flow.flow_state().current_step, TicketStep::CollectEmail);
//! ```

mod messages;
mod validate;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use support_agent_config::constants::{limits, timeouts};
use support_agent_config::DeliveryConfig;
use support_agent_core::{Error, Result, SupportTicket, TicketDelivery};

use validate::EmailCheck;

/// Ticket flow steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStep {
    #[default]
    Idle,
    CollectName,
    CollectEmail,
    CollectCustomerNumber,
    CollectProblem,
    Submitting,
    Completed,
}

impl TicketStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStep::Idle => "idle",
            TicketStep::CollectName => "collect_name",
            TicketStep::CollectEmail => "collect_email",
            TicketStep::CollectCustomerNumber => "collect_customer_number",
            TicketStep::CollectProblem => "collect_problem",
            TicketStep::Submitting => "submitting",
            TicketStep::Completed => "completed",
        }
    }

    /// Steps during which user input belongs to the flow
    pub fn is_active(&self) -> bool {
        !matches!(self, TicketStep::Idle | TicketStep::Completed)
    }

    /// Steps whose answers carry no language of their own
    pub fn takes_identifier(&self) -> bool {
        matches!(self, TicketStep::CollectEmail | TicketStep::CollectCustomerNumber)
    }
}

/// Fields collected so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub customer_number: Option<String>,
    pub problem: Option<String>,
}

/// Snapshot of the flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketFlowState {
    pub current_step: TicketStep,
    pub data: TicketData,
    pub is_active: bool,
}

/// Result of one input
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Field accepted; carries the next prompt
    Advanced(String),
    /// Field rejected; carries the corrective message
    Rejected(String),
    /// Ticket delivered; carries the confirmation summary
    Submitted { ticket: SupportTicket, message: String },
    /// Delivery failed; the flow waits in `submitting` for a retry
    DeliveryFailed(String),
    /// Delivery failed on the last allowed attempt; the flow is reset
    Abandoned(String),
}

impl StepOutcome {
    /// Text to send to the user
    pub fn message(&self) -> &str {
        match self {
            StepOutcome::Advanced(m)
            | StepOutcome::Rejected(m)
            | StepOutcome::DeliveryFailed(m)
            | StepOutcome::Abandoned(m) => m,
            StepOutcome::Submitted { message, .. } => message,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            StepOutcome::Advanced(m)
            | StepOutcome::Rejected(m)
            | StepOutcome::DeliveryFailed(m)
            | StepOutcome::Abandoned(m) => m,
            StepOutcome::Submitted { message, .. } => message,
        }
    }
}

/// Delivery settings for the flow
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Direct contact offered when delivery fails
    pub support_email: String,
    /// Delivery attempts before giving up, counting the first
    pub max_delivery_attempts: u32,
    pub delivery_timeout: Duration,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            support_email: "support@example.com".to_string(),
            max_delivery_attempts: limits::MAX_DELIVERY_ATTEMPTS,
            delivery_timeout: Duration::from_millis(timeouts::DELIVERY_MS),
        }
    }
}

impl From<&DeliveryConfig> for IntakeConfig {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            support_email: config.support_email.clone(),
            max_delivery_attempts: config.max_attempts.max(1),
            delivery_timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Per-session ticket intake state machine
pub struct TicketIntakeMachine {
    state: TicketFlowState,
    delivery: Arc<dyn TicketDelivery>,
    config: IntakeConfig,
    /// Corrected address awaiting the user's confirmation
    email_suggestion: Option<String>,
    /// Built on entering `submitting`, reused for retries
    pending_ticket: Option<SupportTicket>,
    delivery_attempts: u32,
    last_ticket: Option<SupportTicket>,
}

impl TicketIntakeMachine {
    pub fn new(delivery: Arc<dyn TicketDelivery>, config: IntakeConfig) -> Self {
        Self {
            state: TicketFlowState::default(),
            delivery,
            config,
            email_suggestion: None,
            pending_ticket: None,
            delivery_attempts: 0,
            last_ticket: None,
        }
    }

    /// Clear collected data and ask for the name
    pub fn start_ticket_flow(&mut self) -> String {
        self.reset();
        self.set_step(TicketStep::CollectName);
        tracing::info!(channel = self.delivery.name(), "Ticket flow started");
        messages::START.to_string()
    }

    /// Handle one user message for the current step.
    ///
    /// Fails with `InvalidFlowState` when no flow is active.
    pub async fn process_input(&mut self, input: &str) -> Result<StepOutcome> {
        let input = input.trim();
        let outcome = match self.state.current_step {
            TicketStep::Idle | TicketStep::Completed => return Err(Error::InvalidFlowState),
            TicketStep::CollectName => self.collect_name(input),
            TicketStep::CollectEmail => self.collect_email(input),
            TicketStep::CollectCustomerNumber => self.collect_customer_number(input),
            TicketStep::CollectProblem => match validate::validate_problem(input) {
                Ok(problem) => {
                    self.state.data.problem = Some(problem);
                    self.set_step(TicketStep::Submitting);
                    self.submit().await
                }
                Err(message) => StepOutcome::Rejected(message.to_string()),
            },
            TicketStep::Submitting => self.submit().await,
        };

        if let StepOutcome::Rejected(_) = outcome {
            tracing::debug!(step = self.state.current_step.as_str(), "Ticket input rejected");
        }
        Ok(outcome)
    }

    /// Abandon the flow from any step
    pub fn cancel_flow(&mut self) -> String {
        let step = self.state.current_step;
        self.reset();
        tracing::info!(step = step.as_str(), "Ticket flow cancelled");
        messages::CANCELLED.to_string()
    }

    pub fn is_flow_active(&self) -> bool {
        self.state.is_active
    }

    pub fn current_step(&self) -> TicketStep {
        self.state.current_step
    }

    pub fn flow_state(&self) -> TicketFlowState {
        self.state.clone()
    }

    /// Back to `idle` with no collected data
    pub fn reset(&mut self) {
        self.state = TicketFlowState::default();
        self.email_suggestion = None;
        self.pending_ticket = None;
        self.delivery_attempts = 0;
    }

    /// Most recently delivered ticket
    pub fn last_ticket(&self) -> Option<&SupportTicket> {
        self.last_ticket.as_ref()
    }

    fn set_step(&mut self, step: TicketStep) {
        let from = self.state.current_step;
        self.state.current_step = step;
        self.state.is_active = step.is_active();
        tracing::debug!(from = from.as_str(), to = step.as_str(), "Ticket step changed");
    }

    fn collect_name(&mut self, input: &str) -> StepOutcome {
        match validate::validate_name(input) {
            Ok(name) => {
                let prompt = messages::name_accepted(&name);
                self.state.data.name = Some(name);
                self.set_step(TicketStep::CollectEmail);
                StepOutcome::Advanced(prompt)
            }
            Err(message) => StepOutcome::Rejected(message.to_string()),
        }
    }

    fn collect_email(&mut self, input: &str) -> StepOutcome {
        // only the reply right after a suggestion can accept it
        if let Some(suggestion) = self.email_suggestion.take() {
            if validate::is_confirmation(input) {
                return self.accept_email(suggestion);
            }
        }

        match validate::validate_email(input) {
            EmailCheck::Valid(email) => self.accept_email(email),
            EmailCheck::Typo { suggestion } => {
                let message = messages::email_typo(&suggestion);
                self.email_suggestion = Some(suggestion);
                StepOutcome::Rejected(message)
            }
            EmailCheck::Invalid(message) => StepOutcome::Rejected(message.to_string()),
        }
    }

    fn accept_email(&mut self, email: String) -> StepOutcome {
        self.state.data.email = Some(email);
        self.set_step(TicketStep::CollectCustomerNumber);
        StepOutcome::Advanced(messages::EMAIL_ACCEPTED.to_string())
    }

    fn collect_customer_number(&mut self, input: &str) -> StepOutcome {
        match validate::validate_customer_number(input) {
            Ok(number) => {
                let prompt = if number.is_some() {
                    messages::NUMBER_ACCEPTED
                } else {
                    messages::NO_NUMBER_ACCEPTED
                };
                self.state.data.customer_number = Some(number.unwrap_or_else(|| "N/A".to_string()));
                self.set_step(TicketStep::CollectProblem);
                StepOutcome::Advanced(prompt.to_string())
            }
            Err(message) => StepOutcome::Rejected(message.to_string()),
        }
    }

    fn build_ticket(&self) -> SupportTicket {
        let data = &self.state.data;
        SupportTicket::new(
            data.name.clone().unwrap_or_default(),
            data.email.clone().unwrap_or_default(),
            data.customer_number.clone().unwrap_or_default(),
            data.problem.clone().unwrap_or_default(),
        )
    }

    async fn submit(&mut self) -> StepOutcome {
        let ticket = match &self.pending_ticket {
            Some(ticket) => ticket.clone(),
            None => {
                let ticket = self.build_ticket();
                self.pending_ticket = Some(ticket.clone());
                ticket
            }
        };
        self.delivery_attempts += 1;

        let result = match tokio::time::timeout(self.config.delivery_timeout, self.delivery.deliver(&ticket)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.config.delivery_timeout.as_millis() as u64)),
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    ticket = ticket.id(),
                    attempts = self.delivery_attempts,
                    channel = self.delivery.name(),
                    "Ticket submitted"
                );
                let message = confirmation_summary(&ticket);
                self.set_step(TicketStep::Completed);
                self.last_ticket = Some(ticket.clone());
                // idle again so the next escalation starts clean
                self.reset();
                StepOutcome::Submitted { ticket, message }
            }
            Err(e) if self.delivery_attempts >= self.config.max_delivery_attempts => {
                tracing::error!(
                    ticket = ticket.id(),
                    attempts = self.delivery_attempts,
                    error = %e,
                    "Ticket delivery abandoned"
                );
                self.reset();
                StepOutcome::Abandoned(messages::delivery_abandoned(&self.config.support_email))
            }
            Err(e) => {
                tracing::warn!(
                    ticket = ticket.id(),
                    attempt = self.delivery_attempts,
                    error = %e,
                    "Ticket delivery failed"
                );
                StepOutcome::DeliveryFailed(messages::delivery_failed(&self.config.support_email))
            }
        }
    }
}

fn confirmation_summary(ticket: &SupportTicket) -> String {
    format!(
        "✅ Your support ticket has been submitted successfully!\n\n\
         📋 Summary:\n\
         • Ticket: {}\n\
         • Name: {}\n\
         • Email: {}\n\
         • Customer #: {}\n\
         • Problem: {}\n\n\
         Our support team has been notified and will contact you at {} within 24 hours.\n\n\
         Is there anything else I can help you with?",
        ticket.id(),
        ticket.name(),
        ticket.email(),
        ticket.customer_number(),
        ticket.problem(),
        ticket.email(),
    )
}
