//! Collaborator traits
//!
//! The dialogue core depends only on these interfaces. Concrete providers
//! live in the `llm`, `text_processing`, `rag` and `tools` crates.

mod delivery;
mod knowledge_source;
mod llm;
mod translator;

pub use delivery::TicketDelivery;
pub use knowledge_source::KnowledgeSource;
pub use llm::{GenerateRequest, LanguageModel};
pub use translator::Translator;
