//! Dialogue orchestration
//!
//! One call to [`DialogueOrchestrator::handle_turn`] processes one user
//! utterance against one session's state:
//!
//! 1. detect the language of the utterance
//! 2. active ticket flow: cancel on a cancel keyword, otherwise forward
//! 3. social message: canned reply
//! 4. knowledge base not loaded: loading message
//! 5. Arabic: translate the query to English for search
//! 6. schedule-type query: direct answer, else knowledge-constrained answer
//!    when enough context matched
//! 7. relevance check on the original query; low relevance clarifies or
//!    escalates
//! 8. knowledge-constrained answer; an unhelpful answer clarifies or
//!    escalates
//!
//! Replies to an Arabic-speaking user are translated into Arabic, except
//! answers generated under the Arabic answer instruction, which are already
//! Arabic. Input without a language of its own (an email address, a customer
//! number, bare digits) keeps the session's previous reply language.
//! Provider failures never fail a turn: each call site falls back to a fixed
//! value and counts the failure.

use std::sync::Arc;

use support_agent_config::constants::{limits, retrieval, sampling, thresholds};
use support_agent_config::{PromptTemplates, Settings};
use support_agent_core::{
    GenerateRequest, Language, LanguageModel, RelevanceResult, Result, Translator,
};
use support_agent_rag::KnowledgeStore;
use support_agent_text_processing::{LanguageDetector, SocialCategory, SocialIntentMatcher};

use crate::assistance::AssistanceResponder;
use crate::helpfulness::{HelpfulnessJudge, PhraseMarkerJudge};
use crate::intake::StepOutcome;
use crate::session::SessionState;

/// Query words that make a direct answer worth trying first
const SCHEDULE_KEYWORDS: &[&str] = &[
    "hours",
    "open",
    "close",
    "business hours",
    "schedule",
    "time",
    "ساعات",
    "وقت",
    "مفتوح",
];

/// Matched as whole words
const CANCEL_WORDS: &[&str] = &["cancel", "stop"];
/// Matched anywhere in the message
const CANCEL_WORDS_AR: &[&str] = &["إلغاء", "الغاء", "توقف"];

/// Tunables of the decision pipeline
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub max_assistance_attempts: u32,
    pub relevance_min_confidence: u8,
    /// Prior turns sent with answer generation
    pub history_window: usize,
    /// Turns retained per session
    pub max_history_turns: usize,
    /// Context longer than this is answered on the fast path
    pub direct_context_min_len: usize,
    pub context_max_length: usize,
    /// Direct contact when no ticket flow exists
    pub support_email: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_assistance_attempts: thresholds::MAX_ASSISTANCE_ATTEMPTS,
            relevance_min_confidence: thresholds::RELEVANCE_MIN_CONFIDENCE,
            history_window: limits::HISTORY_WINDOW,
            max_history_turns: limits::MAX_HISTORY_TURNS,
            direct_context_min_len: thresholds::DIRECT_CONTEXT_MIN_LEN,
            context_max_length: retrieval::CONTEXT_MAX_LENGTH,
            support_email: "support@example.com".to_string(),
        }
    }
}

impl From<&Settings> for OrchestratorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            max_assistance_attempts: settings.agent.max_assistance_attempts,
            relevance_min_confidence: settings.agent.relevance_min_confidence,
            history_window: settings.agent.history_window,
            max_history_turns: settings.agent.max_history_turns,
            direct_context_min_len: settings.agent.direct_context_min_len,
            context_max_length: settings.knowledge.context_max_length,
            support_email: settings.delivery.support_email.clone(),
        }
    }
}

/// How a turn was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRoute {
    TicketFlow,
    TicketCancelled,
    Social,
    Loading,
    DirectAnswer,
    ContextAnswer,
    Clarify,
    Escalated,
    Answered,
    AnswerFallback,
}

impl TurnRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRoute::TicketFlow => "ticket_flow",
            TurnRoute::TicketCancelled => "ticket_cancelled",
            TurnRoute::Social => "social",
            TurnRoute::Loading => "loading",
            TurnRoute::DirectAnswer => "direct_answer",
            TurnRoute::ContextAnswer => "context_answer",
            TurnRoute::Clarify => "clarify",
            TurnRoute::Escalated => "escalated",
            TurnRoute::Answered => "answered",
            TurnRoute::AnswerFallback => "answer_fallback",
        }
    }
}

/// Reply to one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    pub response: String,
    /// Language the reply is in
    pub language: Language,
    pub route: TurnRoute,
    /// Whether the next message belongs to the ticket flow
    pub ticket_flow_active: bool,
}

/// Shared, stateless decision pipeline; all conversation state lives in
/// [`SessionState`]
pub struct DialogueOrchestrator {
    detector: LanguageDetector,
    translator: Arc<dyn Translator>,
    knowledge: Arc<KnowledgeStore>,
    social: Arc<SocialIntentMatcher>,
    judge: Arc<dyn HelpfulnessJudge>,
    model: Arc<dyn LanguageModel>,
    responder: AssistanceResponder,
    prompts: Arc<PromptTemplates>,
    config: OrchestratorConfig,
}

impl DialogueOrchestrator {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        knowledge: Arc<KnowledgeStore>,
        translator: Arc<dyn Translator>,
        prompts: Arc<PromptTemplates>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            detector: LanguageDetector::new(),
            translator,
            knowledge,
            social: Arc::new(SocialIntentMatcher::new()),
            judge: Arc::new(PhraseMarkerJudge::new()),
            responder: AssistanceResponder::new(model.clone(), prompts.assistance.clone()),
            model,
            prompts,
            config,
        }
    }

    pub fn with_social_matcher(mut self, social: Arc<SocialIntentMatcher>) -> Self {
        self.social = social;
        self
    }

    pub fn with_helpfulness_judge(mut self, judge: Arc<dyn HelpfulnessJudge>) -> Self {
        self.judge = judge;
        self
    }

    pub fn with_detector(mut self, detector: LanguageDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeStore> {
        &self.knowledge
    }

    /// Process one utterance and record the exchange in the session history
    pub async fn handle_turn(&self, state: &mut SessionState, utterance: &str) -> TurnOutput {
        let language = self.reply_language(state, utterance);
        state.language = language;

        let (response, route) = self.decide(state, utterance, language).await;

        state.push_exchange(utterance, &response, self.config.max_history_turns);
        metrics::counter!("support_agent_turns_total", "route" => route.as_str()).increment(1);
        tracing::debug!(
            session_id = %state.id(),
            route = route.as_str(),
            language = %language,
            attempts = state.assistance.attempt_count(),
            "Turn handled"
        );

        TurnOutput {
            response,
            language,
            route,
            ticket_flow_active: state.is_ticket_flow_active(),
        }
    }

    /// Reply for a turn whose task never finished
    pub fn interrupted_turn(&self) -> TurnOutput {
        TurnOutput {
            response: self.prompts.messages.answer_fallback.clone(),
            language: Language::English,
            route: TurnRoute::AnswerFallback,
            ticket_flow_active: false,
        }
    }

    fn reply_language(&self, state: &SessionState, utterance: &str) -> Language {
        let detection = self.detector.detect(utterance);
        if detection.language.is_arabic() {
            return detection.language;
        }
        let at_identifier_step = state
            .ticket_flow
            .as_ref()
            .map_or(false, |flow| flow.current_step().takes_identifier());
        if detection.confidence == 0.0 || at_identifier_step {
            state.language
        } else {
            detection.language
        }
    }

    async fn decide(
        &self,
        state: &mut SessionState,
        utterance: &str,
        language: Language,
    ) -> (String, TurnRoute) {
        if state.is_ticket_flow_active() {
            return self.continue_ticket_flow(state, utterance, language).await;
        }

        if let Some(social) = self.social.classify(utterance) {
            let reply = if language.is_arabic() && social.matched_language.is_arabic() {
                self.arabic_phrase(social.category).to_string()
            } else {
                self.localize(&social.response, language).await
            };
            return (reply, TurnRoute::Social);
        }

        if !self.knowledge.is_loaded() {
            let message = if language.is_arabic() {
                self.prompts.arabic.loading.clone()
            } else {
                self.prompts.messages.loading.clone()
            };
            return (message, TurnRoute::Loading);
        }

        let search_query = if language.is_arabic() {
            match self.translator.to_english(utterance).await {
                Ok(english) => english,
                Err(e) => {
                    self.provider_failure("query_translation", &e);
                    utterance.to_string()
                }
            }
        } else {
            utterance.to_string()
        };

        if has_schedule_keyword(&search_query) {
            if let Some(answer) = self.knowledge.get_direct_answer(&search_query) {
                state.assistance.reset();
                return (self.localize(&answer, language).await, TurnRoute::DirectAnswer);
            }

            let context = self
                .knowledge
                .get_relevant_context(&search_query, self.config.context_max_length);
            if context.chars().count() > self.config.direct_context_min_len {
                return match self.answer(state, &search_query, &context, language).await {
                    Ok(answer) => (answer, TurnRoute::ContextAnswer),
                    Err(e) => {
                        self.provider_failure("answer", &e);
                        self.answer_fallback(language).await
                    }
                };
            }
        }

        let relevance = match self.knowledge.check_relevance(utterance).await {
            Ok(result) => result,
            Err(e) => {
                self.provider_failure("relevance", &e);
                RelevanceResult::not_relevant()
            }
        };

        if !relevance.is_answerable(self.config.relevance_min_confidence) {
            let attempt = state.assistance.record_attempt(utterance);
            if state.assistance.should_try_to_help() {
                return self.clarify(utterance, attempt, language).await;
            }
            return self.escalate(state, language).await;
        }

        let context = self
            .knowledge
            .get_relevant_context(&search_query, self.config.context_max_length);
        let answer = match self.answer(state, &search_query, &context, language).await {
            Ok(answer) => answer,
            Err(e) => {
                self.provider_failure("answer", &e);
                return self.answer_fallback(language).await;
            }
        };

        if self.judge.is_unhelpful(&answer) {
            tracing::debug!(session_id = %state.id(), "Answer judged unhelpful");
            if state.assistance.attempt_count() >= 1 || !state.assistance.should_try_to_help() {
                return self.escalate(state, language).await;
            }
            let attempt = state.assistance.record_attempt(utterance);
            return self.clarify(utterance, attempt, language).await;
        }

        state.assistance.reset();
        (answer, TurnRoute::Answered)
    }

    async fn continue_ticket_flow(
        &self,
        state: &mut SessionState,
        utterance: &str,
        language: Language,
    ) -> (String, TurnRoute) {
        let session_id = state.id().to_string();
        let Some(flow) = state.ticket_flow.as_mut() else {
            return (self.direct_contact(), TurnRoute::TicketFlow);
        };

        if is_cancel_request(utterance) {
            metrics::counter!("support_agent_tickets_total", "outcome" => "cancelled").increment(1);
            let message = flow.cancel_flow();
            return (self.localize(&message, language).await, TurnRoute::TicketCancelled);
        }

        let message = match flow.process_input(utterance).await {
            Ok(outcome) => {
                let label = match &outcome {
                    StepOutcome::Submitted { .. } => Some("submitted"),
                    StepOutcome::DeliveryFailed(_) => Some("delivery_failed"),
                    StepOutcome::Abandoned(_) => Some("abandoned"),
                    _ => None,
                };
                if let Some(outcome) = label {
                    metrics::counter!("support_agent_tickets_total", "outcome" => outcome).increment(1);
                }
                outcome.into_message()
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Ticket flow out of sync, resetting");
                flow.reset();
                self.direct_contact()
            }
        };
        (self.localize(&message, language).await, TurnRoute::TicketFlow)
    }

    async fn clarify(&self, utterance: &str, attempt: u32, language: Language) -> (String, TurnRoute) {
        tracing::info!(attempt, max = self.config.max_assistance_attempts, "Asking a clarifying question");
        let question = self
            .responder
            .generate_helpful_response(utterance, attempt, &self.knowledge.get_summary())
            .await;
        (self.localize(&question, language).await, TurnRoute::Clarify)
    }

    async fn escalate(&self, state: &mut SessionState, language: Language) -> (String, TurnRoute) {
        state.assistance.reset();
        metrics::counter!("support_agent_escalations_total").increment(1);

        let escalation = &self.prompts.messages.escalation;
        let message = match state.ticket_flow.as_mut() {
            Some(flow) => format!("{}\n\n{}", escalation, flow.start_ticket_flow()),
            None => format!("{}\n\n{}", escalation, self.direct_contact()),
        };
        tracing::info!(
            session_id = %state.id(),
            ticket_flow = state.ticket_flow.is_some(),
            "Escalating to support"
        );
        (self.localize(&message, language).await, TurnRoute::Escalated)
    }

    /// Knowledge-constrained completion over `context` and recent history,
    /// generated directly in `language`
    async fn answer(
        &self,
        state: &SessionState,
        query: &str,
        context: &str,
        language: Language,
    ) -> Result<String> {
        let request = GenerateRequest::new(self.prompts.answer.build(context, language))
            .with_history(state.recent_history(self.config.history_window))
            .with_user(query)
            .with_temperature(sampling::ANSWER_TEMPERATURE)
            .with_max_tokens(sampling::ANSWER_MAX_TOKENS);
        self.model.complete(request).await
    }

    async fn answer_fallback(&self, language: Language) -> (String, TurnRoute) {
        let message = self.prompts.messages.answer_fallback.clone();
        (self.localize(&message, language).await, TurnRoute::AnswerFallback)
    }

    /// Translate fixed English text into Arabic for Arabic speakers. Such text
    /// may quote Arabic user input, so it is translated whatever its script.
    async fn localize(&self, text: &str, language: Language) -> String {
        if !language.is_arabic() {
            return text.to_string();
        }
        match self.translator.to_arabic(text).await {
            Ok(translated) => translated,
            Err(e) => {
                self.provider_failure("reply_translation", &e);
                text.to_string()
            }
        }
    }

    fn arabic_phrase(&self, category: SocialCategory) -> &str {
        let phrases = &self.prompts.arabic;
        match category {
            SocialCategory::Greeting => &phrases.greeting,
            SocialCategory::Thanks => &phrases.thanks,
            SocialCategory::Goodbye => &phrases.goodbye,
            SocialCategory::Affirmative => &phrases.affirmative,
            SocialCategory::HowAreYou => &phrases.how_are_you,
        }
    }

    fn direct_contact(&self) -> String {
        self.prompts.messages.direct_contact(&self.config.support_email)
    }

    fn provider_failure(&self, call_site: &'static str, error: &support_agent_core::Error) {
        tracing::warn!(call_site, kind = error.kind(), error = %error, "Provider call failed, using fallback");
        metrics::counter!("support_agent_provider_failures_total", "call_site" => call_site).increment(1);
    }
}

fn has_schedule_keyword(query: &str) -> bool {
    let lower = query.to_lowercase();
    SCHEDULE_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn is_cancel_request(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    let english = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| CANCEL_WORDS.contains(&word));
    english || CANCEL_WORDS_AR.iter().any(|w| lower.contains(w))
}
