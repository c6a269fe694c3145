//! Knowledge source

use async_trait::async_trait;

use crate::{KnowledgeSnapshot, Result};

/// Where knowledge rows come from (spreadsheet API, local file, ...)
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Fetch the full knowledge base
    async fn fetch(&self) -> Result<KnowledgeSnapshot>;

    /// Source name, for logs
    fn name(&self) -> &str;
}
