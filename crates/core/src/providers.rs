/// Provider traits for the five external collaborators named in §6: the
/// language model, the embedding model, mail, calendar, and web search.
/// The orchestration graph is written once against these abstractions;
/// production backends and the deterministic mocks both implement them.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Set only on `ChatRole::Tool` messages: the tool call this result answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A named function the model may invoke, described for the provider's
/// tool-calling mode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters_schema: serde_json::Value,
}

/// A structured tool invocation emitted by the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// One chat-completion request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.3
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            temperature: default_temperature(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// The model's reply: text and, in tool-calling mode, zero or more tool calls.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ChatResponse {
    pub text: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnreadMessage {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub sender: String,
    pub snippet: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
    pub body: String,
}

#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn list_unread_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<UnreadMessage>, ProviderError>;

    async fn fetch_message(&self, id: &str) -> Result<UnreadMessage, ProviderError>;

    async fn fetch_thread(&self, thread_id: &str) -> Result<Vec<crate::email::ConversationMessage>, ProviderError>;

    async fn list_sent_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SentMessage>, ProviderError>;

    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<&crate::response::Attachment>,
    ) -> Result<(), ProviderError>;

    async fn mark_read(&self, id: &str) -> Result<(), ProviderError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BusyRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub link: String,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn free_busy(
        &self,
        email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyRange>, ProviderError>;

    async fn insert_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        attendees: &[String],
        description: Option<&str>,
    ) -> Result<CalendarEvent, ProviderError>;

    async fn list_upcoming(&self, max_results: u32) -> Result<Vec<CalendarEvent>, ProviderError>;

    async fn update_event(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<CalendarEvent, ProviderError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), ProviderError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_message_carries_call_id() {
        let msg = ChatMessage::tool_result("call-1", "no conflicts found");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(msg.role, ChatRole::Tool);
    }

    #[test]
    fn chat_response_detects_tool_calls() {
        let mut resp = ChatResponse::default();
        assert!(!resp.has_tool_calls());
        resp.tool_calls.push(ToolCall {
            id: "1".into(),
            name: "check_availability".into(),
            arguments: serde_json::json!({}),
        });
        assert!(resp.has_tool_calls());
    }

    #[test]
    fn chat_request_default_temperature_matches_original_router() {
        let req = ChatRequest::new(vec![ChatMessage::user("hi")]);
        assert_eq!(req.temperature, 0.3);
    }
}
