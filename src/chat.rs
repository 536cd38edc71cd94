//! Chat pipeline — one free-text turn against the hosted model.
//!
//! Simpler sibling of the analysis pipeline: no normalization, just a fixed
//! system instruction around the user's question and a fixed safety-tips
//! fallback when the upstream call fails. The transcript itself lives in
//! `CoreState`; this module only produces messages.

use serde::{Deserialize, Serialize};

use crate::pipeline::analysis::TextModel;

/// Assistant message seeding every fresh transcript.
pub const GREETING: &str = "Hello! I'm your medical assistant. I can help you with \
questions about medicines, symptoms, and general health information. How can I \
assist you today?";

/// Fixed reply used whenever the hosted model cannot be reached.
pub const FALLBACK_RESPONSE: &str = "I apologize, but I'm having trouble connecting \
to my AI service right now. Here are some general medical tips:

\u{2022} Always read medicine labels carefully
\u{2022} Take medications as prescribed by your doctor
\u{2022} Store medicines in a cool, dry place
\u{2022} Check expiration dates regularly
\u{2022} Consult a healthcare professional for any medical concerns

Please try again later or contact a healthcare professional for immediate medical advice.";

const SYSTEM_INSTRUCTION: &str = "You are a helpful medical assistant. Provide \
accurate, helpful information about medicines, symptoms, and general health \
questions. Always remind users to consult healthcare professionals for serious \
medical concerns. Keep responses concise but informative.";

/// Wrap one user question in the fixed system instruction.
pub fn build_chat_prompt(message: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n\nUser question: {message}\n\nPlease provide a helpful response:")
}

/// Suggested opener shown next to an empty transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSuggestion {
    pub text: String,
    pub category: String,
}

/// Default prompt suggestions for a fresh conversation.
pub fn quick_questions() -> Vec<PromptSuggestion> {
    vec![
        PromptSuggestion {
            text: "What are the side effects of paracetamol?".into(),
            category: "medications".into(),
        },
        PromptSuggestion {
            text: "How should I store my medications?".into(),
            category: "medications".into(),
        },
        PromptSuggestion {
            text: "What should I do if I miss a dose?".into(),
            category: "medications".into(),
        },
        PromptSuggestion {
            text: "Can I take multiple medications together?".into(),
            category: "safety".into(),
        },
        PromptSuggestion {
            text: "When should I see a doctor?".into(),
            category: "general".into(),
        },
    ]
}

/// Sends one chat turn to the hosted model.
///
/// Never fails outward: a transport failure becomes `FALLBACK_RESPONSE`.
pub struct ChatTurnHandler {
    model: Box<dyn TextModel>,
}

impl ChatTurnHandler {
    pub fn new(model: impl TextModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    /// Produce the assistant's reply to one user message.
    ///
    /// The caller is responsible for rejecting empty messages before the
    /// turn reaches this point.
    pub async fn reply(&self, message: &str) -> String {
        match self.model.generate_text(&build_chat_prompt(message)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "chat upstream call failed, using fallback reply");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::MockModel;

    #[tokio::test]
    async fn reply_passes_model_text_through() {
        let handler = ChatTurnHandler::new(MockModel::new("Drink water and rest."));
        assert_eq!(handler.reply("I have a mild cold").await, "Drink water and rest.");
    }

    #[tokio::test]
    async fn transport_failure_yields_safety_tips() {
        let handler = ChatTurnHandler::new(MockModel::failing("dns failure"));
        let reply = handler.reply("anything").await;
        assert_eq!(reply, FALLBACK_RESPONSE);
        assert!(reply.contains("read medicine labels"));
    }

    #[test]
    fn prompt_embeds_question_and_instruction() {
        let prompt = build_chat_prompt("Is ibuprofen safe with food?");
        assert!(prompt.contains("Is ibuprofen safe with food?"));
        assert!(prompt.contains("consult healthcare professionals"));
    }

    #[test]
    fn quick_questions_are_non_empty() {
        let suggestions = quick_questions();
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().all(|s| !s.text.is_empty()));
        assert!(suggestions.iter().all(|s| !s.category.is_empty()));
    }

    #[test]
    fn greeting_mentions_medicines() {
        assert!(GREETING.contains("medicines"));
    }
}
