/// Deterministic `MailProvider` stub backed by fixture data held behind a
/// mutex, recording every `send`/`mark_read` call so CLI demos and tests can
/// assert on outbound behavior without a real mail backend.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use replyforge_core::{Attachment, ConversationMessage, MailProvider, ProviderError, SentMessage, UnreadMessage};

#[derive(Clone, Debug)]
pub struct SentRecord {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

pub struct MockMailProvider {
    unread: Mutex<Vec<UnreadMessage>>,
    sent_history: Mutex<Vec<SentMessage>>,
    threads: Mutex<Vec<(String, Vec<ConversationMessage>)>>,
    sent_log: Mutex<Vec<SentRecord>>,
    read_log: Mutex<Vec<String>>,
}

impl MockMailProvider {
    pub fn new() -> Self {
        Self {
            unread: Mutex::new(Vec::new()),
            sent_history: Mutex::new(Vec::new()),
            threads: Mutex::new(Vec::new()),
            sent_log: Mutex::new(Vec::new()),
            read_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_unread(self, messages: Vec<UnreadMessage>) -> Self {
        *self.unread.lock().expect("lock poisoned") = messages;
        self
    }

    pub fn with_sent_history(self, messages: Vec<SentMessage>) -> Self {
        *self.sent_history.lock().expect("lock poisoned") = messages;
        self
    }

    pub fn with_thread(self, thread_id: impl Into<String>, messages: Vec<ConversationMessage>) -> Self {
        self.threads.lock().expect("lock poisoned").push((thread_id.into(), messages));
        self
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent_log.lock().expect("lock poisoned").clone()
    }

    pub fn marked_read(&self) -> Vec<String> {
        self.read_log.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockMailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailProvider for MockMailProvider {
    async fn list_unread_since(&self, _since: DateTime<Utc>) -> Result<Vec<UnreadMessage>, ProviderError> {
        Ok(self.unread.lock().expect("lock poisoned").clone())
    }

    async fn fetch_message(&self, id: &str) -> Result<UnreadMessage, ProviderError> {
        self.unread
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::Rejected(format!("no mock message with id {id}")))
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<Vec<ConversationMessage>, ProviderError> {
        Ok(self
            .threads
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|(id, _)| id == thread_id)
            .map(|(_, messages)| messages.clone())
            .unwrap_or_default())
    }

    async fn list_sent_since(&self, _since: DateTime<Utc>) -> Result<Vec<SentMessage>, ProviderError> {
        Ok(self.sent_history.lock().expect("lock poisoned").clone())
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<&Attachment>,
    ) -> Result<(), ProviderError> {
        self.sent_log.lock().expect("lock poisoned").push(SentRecord {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: attachment.cloned(),
        });
        Ok(())
    }

    async fn mark_read(&self, id: &str) -> Result<(), ProviderError> {
        self.read_log.lock().expect("lock poisoned").push(id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unread(id: &str) -> UnreadMessage {
        UnreadMessage {
            id: id.to_string(),
            thread_id: "thread-1".to_string(),
            subject: "Hi".to_string(),
            sender: "a@b.com".to_string(),
            snippet: "hi".to_string(),
            body: "hi".to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_message_finds_fixture_by_id() {
        let mail = MockMailProvider::new().with_unread(vec![unread("1"), unread("2")]);
        let found = mail.fetch_message("2").await.unwrap();
        assert_eq!(found.id, "2");
    }

    #[tokio::test]
    async fn fetch_message_missing_id_errors() {
        let mail = MockMailProvider::new();
        assert!(mail.fetch_message("nope").await.is_err());
    }

    #[tokio::test]
    async fn send_and_mark_read_are_recorded() {
        let mail = MockMailProvider::new();
        mail.send("x@y.com", "subj", "body", None).await.unwrap();
        mail.mark_read("1").await.unwrap();
        assert_eq!(mail.sent().len(), 1);
        assert_eq!(mail.marked_read(), vec!["1".to_string()]);
    }
}
