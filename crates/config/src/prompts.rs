//! Prompt templates configuration
//!
//! System prompts for every completion call site plus the fixed messages
//! the agent sends without a model. Placeholders in braces (`{context}`,
//! `{summary}`, ...) are substituted by the builder methods.

use serde::{Deserialize, Serialize};
use support_agent_core::Language;

/// Prompt templates configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Knowledge-constrained answering
    #[serde(default)]
    pub answer: AnswerPrompt,
    /// Topical relevance classification
    #[serde(default)]
    pub relevance: RelevancePrompt,
    /// Clarifying questions before escalation
    #[serde(default)]
    pub assistance: AssistancePrompts,
    /// English/Arabic translation
    #[serde(default)]
    pub translation: TranslationPrompts,
    /// Fixed agent messages
    #[serde(default)]
    pub messages: AgentMessages,
    /// Fixed Arabic phrases for social replies
    #[serde(default)]
    pub arabic: ArabicPhrases,
}

/// Answer generation prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPrompt {
    /// Template with `{language_instruction}` and `{context}`
    pub template: String,
    /// Appended as rule 5 when the user writes Arabic
    pub arabic_instruction: String,
}

impl Default for AnswerPrompt {
    fn default() -> Self {
        Self {
            template: "You are a helpful business assistant. You can ONLY answer questions using the information provided in the knowledge base below.

IMPORTANT RULES:
1. ONLY use information from the knowledge base below
2. Be concise and professional (1-2 sentences max)
3. Do not make up information
4. Do not answer general knowledge questions{language_instruction}

KNOWLEDGE BASE:
{context}

Remember: Stay strictly within the scope of the knowledge base. Be brief."
                .to_string(),
            arabic_instruction:
                "\n5. IMPORTANT: The user is speaking Arabic. Respond in Arabic (العربية)."
                    .to_string(),
        }
    }
}

impl AnswerPrompt {
    pub fn build(&self, context: &str, respond_in: Language) -> String {
        let instruction = if respond_in.is_arabic() {
            self.arabic_instruction.as_str()
        } else {
            ""
        };
        self.template
            .replace("{language_instruction}", instruction)
            .replace("{context}", context)
    }
}

/// Relevance check prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevancePrompt {
    /// Template with `{excerpt}`
    pub template: String,
    /// User message template with `{query}`
    pub question_template: String,
}

impl Default for RelevancePrompt {
    fn default() -> Self {
        Self {
            template: r#"You are a relevance checker. Your job is to determine if a user's question can be answered using the provided business knowledge base.

Knowledge Base Contains:
{excerpt}

Analyze the user's question and respond with ONLY a JSON object in this exact format:
{
  "isRelevant": true/false,
  "confidence": 0-100,
  "reasoning": "brief explanation"
}

Rules:
- Return isRelevant: true if the question is related to ANY information in the knowledge base
- Even if partially related, return true with appropriate confidence score
- Return isRelevant: false ONLY for completely unrelated topics (weather, jokes, general knowledge)
- Confidence should be 0-100 (higher = more confident)
- Be generous with relevance - if there's ANY connection, mark as relevant
- Keep reasoning brief (one sentence)"#
                .to_string(),
            question_template: "Question: \"{query}\"".to_string(),
        }
    }
}

impl RelevancePrompt {
    pub fn build(&self, excerpt: &str) -> String {
        self.template.replace("{excerpt}", excerpt)
    }

    pub fn question(&self, query: &str) -> String {
        self.question_template.replace("{query}", query)
    }
}

/// Attempt-specific clarifying prompts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistancePrompts {
    /// First attempt, with `{summary}`
    pub first_attempt: String,
    /// Second and later attempts, with `{summary}`
    pub later_attempt: String,
    /// Used when the first-attempt call fails
    pub first_fallback: String,
    /// Used when a later-attempt call fails
    pub later_fallback: String,
}

impl Default for AssistancePrompts {
    fn default() -> Self {
        Self {
            first_attempt: r#"You are a helpful customer service assistant. A customer has a question that might not be directly in our knowledge base, but you should try to help them.

Our knowledge base covers: {summary}

Your goal for this FIRST attempt:
1. Try to understand what they're really asking for
2. Ask ONE clarifying question to better understand
3. Be brief and direct

IMPORTANT:
- Keep response under 2 sentences
- Ask ONE specific question
- Do NOT mention support tickets
- Be direct and helpful

Example responses:
- "Could you tell me more about what specifically you need help with?"
- "What exactly are you trying to do?"
- "Can you describe the issue in more detail?""#
                .to_string(),
            later_attempt: r#"You are a helpful customer service assistant. This is your SECOND attempt to help a customer.

Our knowledge base covers: {summary}

Your goal for this SECOND attempt:
1. Try ONE more clarifying question from a different angle
2. Be brief - maximum 2 sentences

IMPORTANT:
- Keep it short (under 2 sentences)
- Ask ONE specific question
- Do NOT mention support tickets
- Be direct

Example responses:
- "Could you rephrase your question? I want to make sure I understand."
- "What's the main issue you're facing?"
- "Can you be more specific about what you need?""#
                .to_string(),
            first_fallback: "Could you tell me more about what you need?".to_string(),
            later_fallback: "Can you rephrase your question? I want to help you properly."
                .to_string(),
        }
    }
}

impl AssistancePrompts {
    pub fn build(&self, attempt: u32, summary: &str) -> String {
        let template = if attempt <= 1 {
            &self.first_attempt
        } else {
            &self.later_attempt
        };
        template.replace("{summary}", summary)
    }

    pub fn fallback(&self, attempt: u32) -> &str {
        if attempt <= 1 {
            &self.first_fallback
        } else {
            &self.later_fallback
        }
    }
}

/// Translation instructions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationPrompts {
    pub to_arabic: String,
    pub to_english: String,
}

impl Default for TranslationPrompts {
    fn default() -> Self {
        Self {
            to_arabic: "You are a translator. Translate the following English text to Arabic. Only provide the translation, nothing else. Keep the tone professional and friendly.".to_string(),
            to_english: "You are a translator. Translate the following Arabic text to English. Only provide the translation, nothing else.".to_string(),
        }
    }
}

impl TranslationPrompts {
    /// Instruction for translating into `to`
    pub fn for_target(&self, to: Language) -> &str {
        match to {
            Language::Arabic => &self.to_arabic,
            Language::English => &self.to_english,
        }
    }
}

/// Messages sent without a completion call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessages {
    /// Knowledge base not loaded yet
    pub loading: String,
    /// Handoff sentence before the ticket flow
    pub escalation: String,
    /// Appended to the escalation when no delivery channel exists, with `{email}`
    pub direct_contact: String,
    /// Answer generation failed
    pub answer_fallback: String,
}

impl Default for AgentMessages {
    fn default() -> Self {
        Self {
            loading: "I'm currently loading our business information. Please try again in a moment.".to_string(),
            escalation: "I'll connect you with our support team for specialized help.".to_string(),
            direct_contact: "Please contact our support team directly at {email}".to_string(),
            answer_fallback: "I'm having trouble looking that up right now. Please try again in a moment.".to_string(),
        }
    }
}

impl AgentMessages {
    pub fn direct_contact(&self, email: &str) -> String {
        self.direct_contact.replace("{email}", email)
    }
}

/// Fixed Arabic replies for social messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArabicPhrases {
    pub greeting: String,
    pub thanks: String,
    pub goodbye: String,
    pub affirmative: String,
    pub how_are_you: String,
    pub loading: String,
}

impl Default for ArabicPhrases {
    fn default() -> Self {
        Self {
            greeting: "مرحباً! 👋 كيف يمكنني مساعدتك اليوم؟".to_string(),
            thanks: "على الرحب والسعة! 😊 سعيد بمساعدتك!".to_string(),
            goodbye: "مع السلامة! أتمنى لك يوماً رائعاً! 🌟".to_string(),
            affirmative: "رائع! كيف يمكنني مساعدتك أيضاً؟ 😊".to_string(),
            how_are_you: "أنا بخير، شكراً لسؤالك! 😊 كيف يمكنني مساعدتك اليوم؟".to_string(),
            loading: "جارٍ تحميل معلومات أعمالنا. يرجى المحاولة مرة أخرى بعد لحظة.".to_string(),
        }
    }
}
