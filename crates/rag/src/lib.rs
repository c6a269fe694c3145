//! Knowledge retrieval for the support agent
//!
//! - [`KnowledgeStore`]: atomically swappable knowledge snapshot with
//!   direct-answer lookup, keyword context retrieval and relevance checks
//! - [`sources`]: where snapshots come from (spreadsheet API, local file)
//! - [`refresh`]: load-on-start and periodic background refresh

pub mod matching;
pub mod refresh;
pub mod relevance;
pub mod sources;
mod store;

pub use refresh::{load_once, spawn_refresh_task};
pub use sources::{create_knowledge_source, FileSource, SheetsSource, SheetsSourceConfig};
pub use store::KnowledgeStore;
