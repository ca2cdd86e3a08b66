/// Composer (§4.8): turns a sub-agent's outcome into a tone-matched,
/// addressed email body. The no-response path never reaches this type —
/// that fixed string is produced directly by the orchestrator.
use replyforge_core::text::strip_think_block;
use replyforge_core::{ChatMessage, ChatRequest, EmailContext, LlmProvider};
use replyforge_retrieval::Retriever;
use tracing::warn;

pub struct Composer;

impl Composer {
    pub fn new() -> Self {
        Self
    }

    pub async fn compose(
        &self,
        agent_text: &str,
        email: &EmailContext,
        tone_retriever: Option<&Retriever>,
        user_name: &str,
        llm: &dyn LlmProvider,
    ) -> String {
        let recipient = recipient_name(&email.sender_display);
        let tone_examples = tone_examples(email, tone_retriever).await;

        let prompt = build_prompt(agent_text, &recipient, tone_examples.as_deref(), user_name);
        match llm.chat(ChatRequest::new(vec![ChatMessage::user(prompt)])).await {
            Ok(response) => strip_think_block(&response.text),
            Err(err) => {
                warn!(error = %err, "composer LLM call failed, returning the sub-agent's raw text");
                agent_text.to_string()
            }
        }
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the recipient's display name from a `Name <addr>` header,
/// falling back to "there" when no name precedes the address (§4.8).
fn recipient_name(sender_display: &str) -> String {
    let name_part = sender_display.split('<').next().unwrap_or("").trim();
    if name_part.is_empty() || name_part.contains('@') {
        "there".to_string()
    } else {
        name_part.to_string()
    }
}

async fn tone_examples(email: &EmailContext, retriever: Option<&Retriever>) -> Option<String> {
    let retriever = retriever?;
    match retriever.query(&email.body).await {
        Ok(chunks) if chunks.is_empty() => None,
        Ok(chunks) => Some(
            chunks
                .iter()
                .map(|c| format!("- {}", c.text))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Err(err) => {
            warn!(error = %err, "failed to query tone index, composing without style guidance");
            None
        }
    }
}

fn build_prompt(agent_text: &str, recipient: &str, tone_examples: Option<&str>, user_name: &str) -> String {
    let tone_block = tone_examples
        .map(|t| format!("\n\nMatch the tone and phrasing of these examples from the user's own past emails:\n{t}"))
        .unwrap_or_default();

    format!(
        "Write the body of an email reply.\n\n\
         Recipient: {recipient}\n\
         Content to convey: {agent_text}{tone_block}\n\n\
         Instructions: greet {recipient} by name, integrate the content above naturally into the \
         reply, sign off as {user_name}, and output only the email body text with no subject line \
         or commentary."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use replyforge_core::{ChatResponse, ProviderError};

    struct FixedLlm(String);

    #[async_trait]
    impl LlmProvider for FixedLlm {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            Ok(ChatResponse {
                text: self.0.clone(),
                tool_calls: Vec::new(),
            })
        }
    }

    fn email(sender: &str) -> EmailContext {
        EmailContext::new("Subject", sender, "jane@x.com", "original body text")
    }

    #[test]
    fn recipient_name_takes_display_name_before_bracket() {
        assert_eq!(recipient_name("Jane Doe <jane@x.com>"), "Jane Doe");
    }

    #[test]
    fn recipient_name_falls_back_to_there_for_bare_address() {
        assert_eq!(recipient_name("jane@x.com"), "there");
    }

    #[test]
    fn recipient_name_falls_back_to_there_for_empty_name() {
        assert_eq!(recipient_name("<jane@x.com>"), "there");
    }

    #[tokio::test]
    async fn compose_strips_leading_think_block() {
        let llm = FixedLlm("<think>plan</think>Hi Jane, thanks for your note. Best, Alex".to_string());
        let text = Composer::new()
            .compose("confirm the meeting", &email("Jane <jane@x.com>"), None, "Alex", &llm)
            .await;
        assert_eq!(text, "Hi Jane, thanks for your note. Best, Alex");
    }

    #[tokio::test]
    async fn compose_falls_back_to_agent_text_on_llm_failure() {
        struct FailingLlm;
        #[async_trait]
        impl LlmProvider for FailingLlm {
            async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
                Err(ProviderError::Timeout)
            }
        }
        let text = Composer::new()
            .compose("raw agent text", &email("Jane <jane@x.com>"), None, "Alex", &FailingLlm)
            .await;
        assert_eq!(text, "raw agent text");
    }

    #[test]
    fn prompt_names_recipient_and_signs_as_user() {
        let prompt = build_prompt("content", "Jane", None, "Alex");
        assert!(prompt.contains("Jane"));
        assert!(prompt.contains("Alex"));
    }

    #[test]
    fn prompt_includes_tone_block_when_examples_present() {
        let prompt = build_prompt("content", "Jane", Some("- Best, Alex"), "Alex");
        assert!(prompt.contains("Match the tone"));
    }
}
