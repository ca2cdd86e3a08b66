/// Intent Classifier (§4.2): a two-stage decision between the static
/// fallback table and a language-model call that returns a JSON
/// `ResponsePlan`.
use replyforge_core::{
    text::extract_json_object, AgentKind, ChatMessage, ChatRequest, ConversationMessage,
    EmailContext, LlmProvider, ResponsePlan,
};
use tracing::{info, warn};

use crate::intent_map::{parse_agent_kind, static_agent_kind};

pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies one email, preferring the model's structured judgment and
    /// falling back to the static table on any parse or validation failure
    /// (§9 "Dynamic JSON classifier output").
    pub async fn classify(
        &self,
        email: &EmailContext,
        history: &[ConversationMessage],
        llm: &dyn LlmProvider,
    ) -> ResponsePlan {
        let fallback_kind = static_agent_kind(&email.intent);

        let prompt = build_prompt(email, history);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = match llm.chat(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "classifier LLM call failed, using static fallback");
                return ResponsePlan::static_fallback(
                    fallback_kind,
                    "LLM call failed; used static intent mapping",
                );
            }
        };

        match extract_json_object(&response.text) {
            Some(value) => match parse_classifier_json(&value) {
                Some(plan) => {
                    info!(agent_kind = ?plan.agent_kind, confidence = plan.confidence, "classifier produced plan");
                    plan
                }
                None => {
                    warn!("classifier JSON had an unknown agent_type, using static fallback");
                    ResponsePlan::static_fallback(
                        fallback_kind,
                        "model returned an unrecognized agent_type; used static intent mapping",
                    )
                }
            },
            None => {
                warn!("classifier response was not parseable JSON, using static fallback");
                ResponsePlan::static_fallback(
                    fallback_kind,
                    "model response had no parseable JSON; used static intent mapping",
                )
            }
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn build_prompt(email: &EmailContext, history: &[ConversationMessage]) -> String {
    let history_block = if history.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = history
            .iter()
            .map(|m| format!("- {}: {}", m.from, m.snippet))
            .collect();
        format!("\nConversation history:\n{}", lines.join("\n"))
    };

    format!(
        "Analyze this email and determine the best response strategy:\n\n\
         Email Details:\n\
         - Subject: {subject}\n\
         - Sender: {sender}\n\
         - Intent: {intent}\n\
         - Summary: {summary}\n\
         - Body Preview: {body_preview}\n\
         {history_block}\n\n\
         Return JSON in this format:\n\
         {{\n\
         \x20\"agent_type\": \"scheduler|info_responder|general_responder|no_response\",\n\
         \x20\"confidence\": 0.0-1.0,\n\
         \x20\"reasoning\": \"Brief reason\",\n\
         \x20\"suggested_action\": \"Action\"\n\
         }}",
        subject = email.subject,
        sender = email.sender_display,
        intent = email.intent,
        summary = email.summary,
        body_preview = &email.body.chars().take(300).collect::<String>(),
        history_block = history_block,
    )
}

fn parse_classifier_json(value: &serde_json::Value) -> Option<ResponsePlan> {
    let agent_type = value.get("agent_type")?.as_str()?;
    let agent_kind = parse_agent_kind(agent_type)?;
    let confidence = value.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.7) as f32;
    let reasoning = value
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let suggested_action = value
        .get("suggested_action")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Some(ResponsePlan {
        agent_kind,
        confidence,
        reasoning,
        suggested_action,
    })
}
