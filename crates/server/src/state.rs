//! Shared application state and its construction from settings

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use support_agent_agent::{DialogueOrchestrator, IntakeConfig, OrchestratorConfig, SessionManager};
use support_agent_config::Settings;
use support_agent_core::{KnowledgeSource, LanguageModel, Result};
use support_agent_llm::{ChatCompletionClient, ChatCompletionConfig};
use support_agent_rag::{create_knowledge_source, KnowledgeStore};
use support_agent_text_processing::{create_translator, TranslationConfig};
use support_agent_tools::create_ticket_delivery;

/// Handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub knowledge: Arc<KnowledgeStore>,
    pub model_name: String,
    /// Absent in tests, where no global recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>, knowledge: Arc<KnowledgeStore>, model_name: impl Into<String>) -> Self {
        Self {
            sessions,
            knowledge,
            model_name: model_name.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Wire every collaborator from settings. The knowledge store starts empty;
/// the returned source is what loads it.
pub fn build_state(settings: &Settings) -> Result<(AppState, Arc<dyn KnowledgeSource>)> {
    let model: Arc<dyn LanguageModel> =
        Arc::new(ChatCompletionClient::new(ChatCompletionConfig::from(&settings.llm))?);

    let translator = create_translator(
        &TranslationConfig {
            cache_enabled: settings.llm.translation_cache,
            prompts: settings.prompts.translation.clone(),
            ..Default::default()
        },
        Some(model.clone()),
    );

    let knowledge = Arc::new(KnowledgeStore::new(model.clone(), settings.prompts.relevance.clone()));
    let source = create_knowledge_source(&settings.knowledge)?;
    let delivery = create_ticket_delivery(&settings.delivery)?;

    let orchestrator = DialogueOrchestrator::new(
        model.clone(),
        knowledge.clone(),
        translator,
        Arc::new(settings.prompts.clone()),
        OrchestratorConfig::from(settings),
    );
    let sessions = Arc::new(SessionManager::new(
        Arc::new(orchestrator),
        delivery,
        IntakeConfig::from(&settings.delivery),
    ));

    tracing::info!(
        model = model.model_name(),
        knowledge_source = source.name(),
        delivery = ?settings.delivery.provider,
        "Services initialized"
    );

    Ok((AppState::new(sessions, knowledge, model.model_name()), source))
}
