//! Knowledge loading and background refresh

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use support_agent_core::{KnowledgeSource, Result};

use crate::KnowledgeStore;

/// Fetch from `source` and swap the result into `store`.
///
/// On failure the store keeps whatever it held before.
pub async fn load_once(store: &KnowledgeStore, source: &dyn KnowledgeSource) -> Result<usize> {
    let snapshot = source.fetch().await?;
    let entries = snapshot.len();
    store.load(snapshot);
    Ok(entries)
}

/// Reload every `period` until the returned handle is aborted.
///
/// The first reload happens one period after spawning; callers do the
/// initial load themselves so startup can report it.
pub fn spawn_refresh_task(
    store: Arc<KnowledgeStore>,
    source: Arc<dyn KnowledgeSource>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match load_once(&store, source.as_ref()).await {
                Ok(entries) => {
                    tracing::debug!(entries, source = source.name(), "Knowledge refreshed")
                }
                Err(e) => tracing::warn!(
                    error = %e,
                    source = source.name(),
                    "Knowledge refresh failed, keeping previous snapshot"
                ),
            }
        }
    })
}
