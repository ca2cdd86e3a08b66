/// Tone Index Builder (§4.3): fetches the user's recent sent mail and
/// builds an ephemeral vector retriever keyed by message body, used later
/// by the Composer to match the user's own writing style.
use std::sync::Arc;

use chrono::{Duration, Utc};
use replyforge_core::{EmbeddingProvider, MailProvider};
use tracing::{debug, warn};

use crate::chunk::Chunker;
use crate::index::Retriever;

pub struct ToneIndexBuilder {
    chunker: Chunker,
    embeddings: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    window_days: u32,
}

impl ToneIndexBuilder {
    pub fn new(
        chunker: Chunker,
        embeddings: Arc<dyn EmbeddingProvider>,
        top_k: usize,
        window_days: u32,
    ) -> Self {
        Self {
            chunker,
            embeddings,
            top_k,
            window_days,
        }
    }

    /// Fetches sent mail within the configured day window and builds a
    /// retriever over it. Any provider failure, or an empty result, is
    /// swallowed and returns `None` — the composer simply proceeds without
    /// tone examples (§4.3).
    pub async fn build(&self, mail: &dyn MailProvider) -> Option<Retriever> {
        let since = Utc::now() - Duration::days(self.window_days as i64);
        let sent = match mail.list_sent_since(since).await {
            Ok(messages) => messages,
            Err(err) => {
                warn!(error = %err, "failed to fetch sent mail for tone index");
                return None;
            }
        };

        if sent.is_empty() {
            debug!("no sent mail in tone window, skipping tone index");
            return None;
        }

        let documents: Vec<(String, Option<String>)> =
            sent.into_iter().map(|m| (m.body, None)).collect();

        match Retriever::build(&documents, &self.chunker, self.embeddings.clone(), self.top_k).await
        {
            Ok(retriever) => retriever,
            Err(err) => {
                warn!(error = %err, "failed to embed sent mail for tone index");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use replyforge_core::{ConversationMessage, ProviderError, SentMessage, UnreadMessage};

    struct ConstEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ConstEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct FakeMail {
        sent: Vec<SentMessage>,
        fail: bool,
    }

    #[async_trait]
    impl MailProvider for FakeMail {
        async fn list_unread_since(
            &self,
            _since: DateTime<Utc>,
        ) -> Result<Vec<UnreadMessage>, ProviderError> {
            Ok(Vec::new())
        }
        async fn fetch_message(&self, _id: &str) -> Result<UnreadMessage, ProviderError> {
            Err(ProviderError::Empty)
        }
        async fn fetch_thread(
            &self,
            _thread_id: &str,
        ) -> Result<Vec<ConversationMessage>, ProviderError> {
            Ok(Vec::new())
        }
        async fn list_sent_since(
            &self,
            _since: DateTime<Utc>,
        ) -> Result<Vec<SentMessage>, ProviderError> {
            if self.fail {
                Err(ProviderError::Network("down".to_string()))
            } else {
                Ok(self.sent.clone())
            }
        }
        async fn send(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
            _attachment: Option<&replyforge_core::Attachment>,
        ) -> Result<(), ProviderError> {
            Ok(())
        }
        async fn mark_read(&self, _id: &str) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    fn builder() -> ToneIndexBuilder {
        ToneIndexBuilder::new(crate::chunk::Chunker::new(1000, 100), Arc::new(ConstEmbedder), 3, 7)
    }

    #[tokio::test]
    async fn returns_none_when_provider_fails() {
        let mail = FakeMail {
            sent: Vec::new(),
            fail: true,
        };
        assert!(builder().build(&mail).await.is_none());
    }

    #[tokio::test]
    async fn returns_none_when_no_sent_mail() {
        let mail = FakeMail {
            sent: Vec::new(),
            fail: false,
        };
        assert!(builder().build(&mail).await.is_none());
    }

    #[tokio::test]
    async fn builds_retriever_over_sent_bodies() {
        let mail = FakeMail {
            sent: vec![SentMessage {
                id: "1".to_string(),
                body: "Thanks so much for reaching out, best regards".to_string(),
            }],
            fail: false,
        };
        let retriever = builder().build(&mail).await.unwrap();
        assert!(!retriever.is_empty());
    }
}
