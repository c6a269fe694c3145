//! HTTP API
//!
//! ```text
//! POST   /api/sessions/:id/messages     {"message": "..."} → turn reply
//! GET    /api/sessions/:id/ticket-flow  → {"active": bool}
//! DELETE /api/sessions/:id              → 204 / 404
//! GET    /health
//! GET    /metrics                       Prometheus text format
//! ```

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use support_agent_config::ServerConfig;

use crate::state::AppState;

/// Longest accepted utterance, in characters
const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub session_id: String,
    pub response: String,
    /// `en` or `ar`
    pub language: &'static str,
    pub route: &'static str,
    pub ticket_flow_active: bool,
}

pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/sessions/:id/messages", post(post_message))
        .route("/api/sessions/:id/ticket-flow", get(ticket_flow_status))
        .route("/api/sessions/:id", delete(end_session))
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);
    if allowed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(allowed))
    }
}

async fn post_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ServerError::BadRequest("message must not be empty".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ServerError::BadRequest(format!(
            "message exceeds {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    let turn = state.sessions.handle_turn(&session_id, message).await;

    Ok(Json(MessageResponse {
        session_id,
        response: turn.response,
        language: turn.language.code(),
        route: turn.route.as_str(),
        ticket_flow_active: turn.ticket_flow_active,
    }))
}

async fn ticket_flow_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    let active = state.sessions.is_ticket_flow_active(&session_id).await;
    Json(serde_json::json!({ "session_id": session_id, "active": active }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    if state.sessions.end_session(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::SessionNotFound(session_id))
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let entries = state.knowledge.snapshot().map(|s| s.len()).unwrap_or(0);
    Json(serde_json::json!({
        "status": "ok",
        "model": state.model_name,
        "knowledge_loaded": state.knowledge.is_loaded(),
        "knowledge_entries": entries,
        "sessions": state.sessions.session_count(),
    }))
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    use support_agent_agent::{DialogueOrchestrator, IntakeConfig, OrchestratorConfig, SessionManager};
    use support_agent_config::PromptTemplates;
    use support_agent_core::{
        Error, GenerateRequest, KnowledgeEntry, KnowledgeSnapshot, LanguageModel, Result,
    };
    use support_agent_rag::KnowledgeStore;
    use support_agent_text_processing::NoopTranslator;

    struct OfflineModel;

    #[async_trait]
    impl LanguageModel for OfflineModel {
        async fn complete(&self, _request: GenerateRequest) -> Result<String> {
            Err(Error::Provider("offline".into()))
        }

        fn model_name(&self) -> &str {
            "offline"
        }
    }

    fn app() -> Router {
        let model: Arc<dyn LanguageModel> = Arc::new(OfflineModel);
        let prompts = PromptTemplates::default();
        let knowledge = Arc::new(KnowledgeStore::new(model.clone(), prompts.relevance.clone()));
        knowledge.load(KnowledgeSnapshot::new(
            vec!["Question".into(), "Answer".into()],
            vec![KnowledgeEntry::new()
                .with("Question", "What are your business hours?")
                .with("Answer", "9am-5pm, Monday to Friday.")],
        ));
        let orchestrator = DialogueOrchestrator::new(
            model,
            knowledge.clone(),
            Arc::new(NoopTranslator::new()),
            Arc::new(prompts),
            OrchestratorConfig::default(),
        );
        let sessions = Arc::new(SessionManager::new(Arc::new(orchestrator), None, IntakeConfig::default()));
        build_app(AppState::new(sessions, knowledge, "offline"), &ServerConfig::default())
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_message_round_trip() {
        let response = app()
            .oneshot(post_json(
                "/api/sessions/abc/messages",
                serde_json::json!({ "message": "what time do you open" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["session_id"], "abc");
        assert_eq!(body["response"], "9am-5pm, Monday to Friday.");
        assert_eq!(body["language"], "en");
        assert_eq!(body["route"], "direct_answer");
        assert_eq!(body["ticket_flow_active"], false);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let response = app()
            .oneshot(post_json("/api/sessions/abc/messages", serde_json::json!({ "message": "   " })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "message must not be empty");
    }

    #[tokio::test]
    async fn test_ticket_flow_status_for_unknown_session() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/sessions/nobody/ticket-flow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["active"], false);
    }

    #[tokio::test]
    async fn test_delete_unknown_session() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/sessions/nobody")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_knowledge() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["knowledge_loaded"], true);
        assert_eq!(body["knowledge_entries"], 1);
        assert_eq!(body["model"], "offline");
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
