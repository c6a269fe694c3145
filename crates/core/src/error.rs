//! Error taxonomy shared across crates

use thiserror::Error;

/// Errors raised by collaborators and the intake machine.
///
/// Validation rejections during ticket intake are not errors; they are a
/// regular step outcome carrying a corrective message.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or non-2xx status from the completion provider
    #[error("provider error: {0}")]
    Provider(String),

    /// Provider answered but returned no usable content
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Provider content could not be interpreted (e.g. no JSON object found)
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Provider call exceeded its deadline
    #[error("provider call timed out after {0} ms")]
    Timeout(u64),

    /// Ticket could not be handed to the notification channel
    #[error("ticket delivery failed: {0}")]
    Delivery(String),

    /// Intake step invoked while no ticket flow is active
    #[error("ticket flow is not active")]
    InvalidFlowState,

    /// Knowledge source fetch failed or returned unusable data
    #[error("knowledge source error: {0}")]
    KnowledgeSource(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Short tag used as a metrics label and in warn logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Provider(_) => "provider",
            Error::EmptyResponse => "empty_response",
            Error::MalformedResponse(_) => "malformed_response",
            Error::Timeout(_) => "timeout",
            Error::Delivery(_) => "delivery",
            Error::InvalidFlowState => "invalid_flow_state",
            Error::KnowledgeSource(_) => "knowledge_source",
            Error::Config(_) => "config",
        }
    }

    /// True for failures of the completion capability.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Error::Provider(_) | Error::EmptyResponse | Error::MalformedResponse(_) | Error::Timeout(_)
        )
    }
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;
