/// General Responder (§4.7): a single language-model call with sender,
/// subject, a capped body preview, conversation history, and the optional
/// user hint baked into the prompt.
use replyforge_core::text::strip_think_block;
use replyforge_core::{AgentOutcome, ChatMessage, ChatRequest, ConversationMessage, EmailContext, LlmProvider};
use tracing::warn;

const BODY_PREVIEW_CHARS: usize = 500;

pub struct GeneralResponder;

impl GeneralResponder {
    pub fn new() -> Self {
        Self
    }

    pub async fn respond(
        &self,
        email: &EmailContext,
        history: &[ConversationMessage],
        user_hint: Option<&str>,
        llm: &dyn LlmProvider,
    ) -> AgentOutcome {
        let prompt = build_prompt(email, history, user_hint);
        match llm.chat(ChatRequest::new(vec![ChatMessage::user(prompt)])).await {
            Ok(response) => AgentOutcome::text_only(strip_think_block(&response.text)),
            Err(err) => {
                warn!(error = %err, "general responder LLM call failed");
                AgentOutcome::text_only(format!("Unable to compose a response: {err}"))
            }
        }
    }
}

impl Default for GeneralResponder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_prompt(email: &EmailContext, history: &[ConversationMessage], user_hint: Option<&str>) -> String {
    let history_block = if history.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = history.iter().map(|m| format!("- {}: {}", m.from, m.snippet)).collect();
        format!("\nConversation history:\n{}", lines.join("\n"))
    };
    let hint_block = user_hint.map(|h| format!("\nUser guidance: {h}")).unwrap_or_default();
    let preview: String = email.body.chars().take(BODY_PREVIEW_CHARS).collect();

    format!(
        "Write a reply to this email.\n\nSender: {sender}\nSubject: {subject}\nBody preview: {preview}{history_block}{hint_block}",
        sender = email.sender_display,
        subject = email.subject,
    )
}
