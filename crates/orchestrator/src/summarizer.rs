/// Email-list summarizer (§2 "Ambient components" #12, §5 "Fan-out within
/// a run"): classifies and summarizes a batch of unread emails with a
/// bounded worker pool of 5, producing the `summary`/`intent` fields the
/// graph consumes. Grounded in the reference crate's own `execute_batch`
/// (spawn-per-task, join, fold join errors into the crate's error type),
/// generalized with a `tokio::sync::Semaphore` cap since inbox batches are
/// not externally bounded the way the reference crate's task batches are.
use std::sync::Arc;

use replyforge_core::{text::extract_json_object, EmailContext, LlmProvider, UnreadMessage};
use tokio::sync::Semaphore;
use tracing::{error, warn};

const DEFAULT_CONCURRENCY: usize = 5;

pub struct EmailSummarizer {
    llm: Arc<dyn LlmProvider>,
    concurrency: usize,
}

impl EmailSummarizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Summarizes and classifies every message, at most `concurrency` at a
    /// time. A message whose LLM call fails still yields an `EmailContext`,
    /// falling back to `"Unknown"` intent (which the static table routes to
    /// `GeneralResponder`) rather than dropping the message from the batch.
    pub async fn summarize_batch(&self, messages: Vec<UnreadMessage>) -> Vec<EmailContext> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::new();

        for message in messages {
            let llm = self.llm.clone();
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore is never closed");
                summarize_one(&message, llm.as_ref()).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(context) => results.push(context),
                Err(err) => error!(error = %err, "email summarization task panicked"),
            }
        }
        results
    }
}

async fn summarize_one(message: &UnreadMessage, llm: &dyn LlmProvider) -> EmailContext {
    use replyforge_core::{ChatMessage, ChatRequest};

    let sender_address = EmailContext::extract_address(&message.sender);
    let prompt = format!(
        "Summarize this email in one sentence and classify its intent.\n\n\
         Subject: {subject}\nFrom: {sender}\nBody: {body}\n\n\
         Return JSON: {{\"summary\": \"...\", \"intent\": \"...\"}}",
        subject = message.subject,
        sender = message.sender,
        body = message.body,
    );

    let response = match llm.chat(ChatRequest::new(vec![ChatMessage::user(prompt)])).await {
        Ok(response) => response,
        Err(err) => {
            warn!(message_id = %message.id, error = %err, "summarizer LLM call failed, using Unknown intent");
            return EmailContext::new(&message.subject, &message.sender, sender_address, &message.body)
                .with_summary(message.snippet.clone(), "Unknown");
        }
    };

    match extract_json_object(&response.text) {
        Some(value) => {
            let summary = value.get("summary").and_then(|v| v.as_str()).unwrap_or(&message.snippet).to_string();
            let intent = value.get("intent").and_then(|v| v.as_str()).unwrap_or("Unknown").to_string();
            EmailContext::new(&message.subject, &message.sender, sender_address, &message.body).with_summary(summary, intent)
        }
        None => {
            warn!(message_id = %message.id, "summarizer response was not parseable JSON, using Unknown intent");
            EmailContext::new(&message.subject, &message.sender, sender_address, &message.body)
                .with_summary(message.snippet.clone(), "Unknown")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use replyforge_core::{ChatRequest, ChatResponse, ProviderError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn message(id: &str) -> UnreadMessage {
        UnreadMessage {
            id: id.to_string(),
            thread_id: "thread-1".to_string(),
            subject: "Quick question".to_string(),
            sender: "Jane Doe <jane@x.com>".to_string(),
            snippet: "hi there".to_string(),
            body: "Do you have a minute to chat tomorrow?".to_string(),
        }
    }

    struct FixedLlm;

    #[async_trait]
    impl LlmProvider for FixedLlm {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            Ok(ChatResponse {
                text: r#"{"summary": "wants to chat tomorrow", "intent": "Scheduling or rescheduling a meeting or event"}"#.to_string(),
                tool_calls: Vec::new(),
            })
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            Err(ProviderError::Network("down".to_string()))
        }
    }

    struct ConcurrencyTrackingLlm {
        current: Arc<AtomicUsize>,
        max_seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmProvider for ConcurrencyTrackingLlm {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(ChatResponse {
                text: r#"{"summary": "s", "intent": "Personal message not related to work"}"#.to_string(),
                tool_calls: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn summarizes_every_message_in_the_batch() {
        let summarizer = EmailSummarizer::new(Arc::new(FixedLlm));
        let contexts = summarizer.summarize_batch(vec![message("1"), message("2")]).await;
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].intent, "Scheduling or rescheduling a meeting or event");
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_unknown_intent_without_dropping_the_message() {
        let summarizer = EmailSummarizer::new(Arc::new(FailingLlm));
        let contexts = summarizer.summarize_batch(vec![message("1")]).await;
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].intent, "Unknown");
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_configured_pool_size() {
        let current = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let llm = Arc::new(ConcurrencyTrackingLlm {
            current: current.clone(),
            max_seen: max_seen.clone(),
        });
        let summarizer = EmailSummarizer::new(llm).with_concurrency(2);
        let messages = (0..8).map(|i| message(&i.to_string())).collect();
        summarizer.summarize_batch(messages).await;
        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }
}
