//! Conversation core of the support agent
//!
//! - [`DialogueOrchestrator`]: per-turn decision pipeline
//! - [`AssistanceTracker`]: bounded clarification attempts before escalation
//! - [`TicketIntakeMachine`]: validated, step-by-step ticket collection
//! - [`SessionManager`]: isolated per-session state with serialized turns
//!
//! # Example
//!
//! ```ignore
//! let orchestrator = Arc::new(DialogueOrchestrator::new(model, knowledge, translator, prompts, config));
//! let sessions = SessionManager::new(orchestrator, delivery, IntakeConfig::from(&settings.delivery));
//!
//! let turn = sessions.handle_turn("session-1", "what time do you open").await;
//! println!("{}", turn.response);
//! ```

pub mod assistance;
pub mod helpfulness;
pub mod intake;
pub mod orchestrator;
pub mod session;

pub use assistance::{AssistanceResponder, AssistanceTracker};
pub use helpfulness::{HelpfulnessJudge, PhraseMarkerJudge};
pub use intake::{IntakeConfig, StepOutcome, TicketData, TicketFlowState, TicketIntakeMachine, TicketStep};
pub use orchestrator::{DialogueOrchestrator, OrchestratorConfig, TurnOutput, TurnRoute};
pub use session::{SessionManager, SessionState};
