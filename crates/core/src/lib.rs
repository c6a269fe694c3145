//! Core types and traits for the support agent
//!
//! This crate holds everything the other crates agree on:
//! - Conversation primitives (`Language`, `Role`, `ConversationTurn`)
//! - Knowledge base shapes (`KnowledgeEntry`, `KnowledgeSnapshot`, `RelevanceResult`)
//! - The immutable `SupportTicket`
//! - Collaborator traits for text completion, translation, knowledge
//!   fetching and ticket delivery
//! - The shared error taxonomy

pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod language;
pub mod ticket;
pub mod traits;

pub use conversation::{ConversationTurn, Role};
pub use error::{Error, Result};
pub use knowledge::{KnowledgeEntry, KnowledgeSnapshot, RelevanceResult};
pub use language::{Language, LanguageDetection};
pub use ticket::SupportTicket;
pub use traits::{GenerateRequest, KnowledgeSource, LanguageModel, TicketDelivery, Translator};
