//! Knowledge sources

mod file;
mod sheets;

pub use file::FileSource;
pub use sheets::{SheetsSource, SheetsSourceConfig};

use std::sync::Arc;

use support_agent_config::{KnowledgeConfig, KnowledgeProvider};
use support_agent_core::{KnowledgeSource, Result};

/// Build the configured knowledge source
pub fn create_knowledge_source(config: &KnowledgeConfig) -> Result<Arc<dyn KnowledgeSource>> {
    match config.provider {
        KnowledgeProvider::Sheets => {
            tracing::info!(sheet = %config.sheet_id, range = %config.range, "Using sheets knowledge source");
            Ok(Arc::new(SheetsSource::new(SheetsSourceConfig::from(config))?))
        }
        KnowledgeProvider::File => {
            tracing::info!(path = %config.file_path, "Using file knowledge source");
            Ok(Arc::new(FileSource::new(&config.file_path)))
        }
    }
}
