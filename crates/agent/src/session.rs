//! Per-session conversation state and the session registry
//!
//! Each session owns its history, assistance tracker and ticket flow. Turns
//! of one session run one at a time; different sessions proceed
//! concurrently. A turn runs on its own task, so a caller that stops waiting
//! (a request timeout, a dropped connection) never leaves a half-applied turn
//! behind.
//!
//! ```ignore
//! let sessions = SessionManager::new(orchestrator, delivery, IntakeConfig::default());
//! let reply = sessions.handle_turn("abc", "What time do you open?").await;
//! assert!(!sessions.is_ticket_flow_active("abc").await);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use support_agent_core::{ConversationTurn, Language, TicketDelivery};

use crate::assistance::AssistanceTracker;
use crate::intake::{IntakeConfig, TicketIntakeMachine};
use crate::orchestrator::{DialogueOrchestrator, TurnOutput};

/// Everything remembered about one conversation
pub struct SessionState {
    id: String,
    history: Vec<ConversationTurn>,
    pub assistance: AssistanceTracker,
    /// `None` when ticket delivery is disabled
    pub ticket_flow: Option<TicketIntakeMachine>,
    /// Language of the latest reply; kept across input with no language of
    /// its own
    pub language: Language,
    created_at: DateTime<Utc>,
    last_active: Instant,
}

impl SessionState {
    pub fn new(
        id: impl Into<String>,
        assistance: AssistanceTracker,
        ticket_flow: Option<TicketIntakeMachine>,
    ) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
            assistance,
            ticket_flow,
            language: Language::English,
            created_at: Utc::now(),
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Last `n` turns, oldest first
    pub fn recent_history(&self, n: usize) -> &[ConversationTurn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Append a user/assistant exchange, keeping at most `max_turns` turns
    pub fn push_exchange(&mut self, user: &str, assistant: &str, max_turns: usize) {
        self.history.push(ConversationTurn::user(user));
        self.history.push(ConversationTurn::assistant(assistant));
        if self.history.len() > max_turns {
            let excess = self.history.len() - max_turns;
            self.history.drain(..excess);
        }
        self.last_active = Instant::now();
    }

    pub fn is_ticket_flow_active(&self) -> bool {
        self.ticket_flow
            .as_ref()
            .map(TicketIntakeMachine::is_flow_active)
            .unwrap_or(false)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }
}

/// Registry of live sessions, created on first message
pub struct SessionManager {
    orchestrator: Arc<DialogueOrchestrator>,
    delivery: Option<Arc<dyn TicketDelivery>>,
    intake: IntakeConfig,
    sessions: DashMap<String, Arc<Mutex<SessionState>>>,
}

impl SessionManager {
    pub fn new(
        orchestrator: Arc<DialogueOrchestrator>,
        delivery: Option<Arc<dyn TicketDelivery>>,
        intake: IntakeConfig,
    ) -> Self {
        Self {
            orchestrator,
            delivery,
            intake,
            sessions: DashMap::new(),
        }
    }

    pub fn orchestrator(&self) -> &Arc<DialogueOrchestrator> {
        &self.orchestrator
    }

    /// Route one utterance through the session's conversation.
    ///
    /// The turn runs to completion even if the returned future is dropped.
    pub async fn handle_turn(&self, session_id: &str, utterance: &str) -> TurnOutput {
        let session = self.session(session_id);
        let orchestrator = self.orchestrator.clone();
        let utterance = utterance.to_string();

        let turn = tokio::spawn(async move {
            let mut state = session.lock_owned().await;
            orchestrator.handle_turn(&mut state, &utterance).await
        });

        match turn.await {
            Ok(output) => output,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::error!(session_id, error = %e, "Turn task cancelled");
                self.orchestrator.interrupted_turn()
            }
        }
    }

    /// Copy of the session's retained history; `None` for unknown sessions
    pub async fn history(&self, session_id: &str) -> Option<Vec<ConversationTurn>> {
        let session = self.sessions.get(session_id).map(|s| s.value().clone())?;
        let state = session.lock().await;
        Some(state.history().to_vec())
    }

    /// Whether the session's next message goes to the ticket flow.
    /// Unknown sessions have no flow.
    pub async fn is_ticket_flow_active(&self, session_id: &str) -> bool {
        let Some(session) = self.sessions.get(session_id).map(|s| s.value().clone()) else {
            return false;
        };
        let state = session.lock().await;
        state.is_ticket_flow_active()
    }

    /// Forget a session; returns whether it existed
    pub fn end_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::info!(session_id, "Session ended");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop sessions idle for longer than `ttl`. Sessions mid-turn are kept.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(state) => state.idle_for() <= ttl,
            Err(_) => true,
        });
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Periodically evict idle sessions until the manager is dropped
    pub fn spawn_eviction_task(self: &Arc<Self>, ttl: Duration, period: Duration) -> JoinHandle<()> {
        let manager = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                manager.evict_idle(ttl);
            }
        })
    }

    fn session(&self, session_id: &str) -> Arc<Mutex<SessionState>> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id, "Session created");
                Arc::new(Mutex::new(self.new_state(session_id)))
            })
            .value()
            .clone()
    }

    fn new_state(&self, session_id: &str) -> SessionState {
        let config = self.orchestrator.config();
        let flow = self
            .delivery
            .as_ref()
            .map(|delivery| TicketIntakeMachine::new(delivery.clone(), self.intake.clone()));
        SessionState::new(
            session_id,
            AssistanceTracker::new(config.max_assistance_attempts),
            flow,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new("s1", AssistanceTracker::new(2), None)
    }

    #[test]
    fn test_history_is_capped() {
        let mut s = state();
        for i in 0..5 {
            s.push_exchange(&format!("q{}", i), &format!("a{}", i), 4);
        }
        assert_eq!(s.history().len(), 4);
        assert_eq!(s.history()[0].content, "q3");
        assert_eq!(s.history()[3].content, "a4");
    }

    #[test]
    fn test_recent_history_window() {
        let mut s = state();
        s.push_exchange("hi", "hello", 50);
        s.push_exchange("hours?", "9 to 5", 50);
        let recent = s.recent_history(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "hello");
        assert_eq!(s.recent_history(10).len(), 4);
    }

    #[test]
    fn test_no_flow_when_delivery_disabled() {
        assert!(!state().is_ticket_flow_active());
    }
}
