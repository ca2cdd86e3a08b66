/// Deterministic `LlmProvider` stub (§2 #11), analogous to the reference
/// crate's `LocalMistralBackend`: no real inference, a canned response
/// shaped by simple keyword heuristics so the CLI demo can exercise every
/// routing path without a live model. Never used on a production path.
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use replyforge_core::{ChatRequest, ChatResponse, LlmProvider, ProviderError, ToolCall};

pub struct MockLlmProvider {
    scheduler_step: AtomicUsize,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            scheduler_step: AtomicUsize::new(0),
        }
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();

        if !request.tools.is_empty() {
            return Ok(scheduler_step_response(self.scheduler_step.fetch_add(1, Ordering::SeqCst)));
        }

        if last.contains("agent_type") {
            return Ok(classify_response(&last));
        }

        Ok(ChatResponse {
            text: format!("[MOCK] Thanks for your message. {}", truncate(&last, 80)),
            tool_calls: Vec::new(),
        })
    }
}

fn scheduler_step_response(step: usize) -> ChatResponse {
    match step {
        0 => ChatResponse {
            text: String::new(),
            tool_calls: vec![ToolCall {
                id: "mock-call-1".to_string(),
                name: "propose_slots".to_string(),
                arguments: serde_json::json!({"busy": [], "working_hours_start": 9, "working_hours_end": 18}),
            }],
        },
        _ => ChatResponse {
            text: "[MOCK] Proposed a few times; let me know which works and I'll confirm.".to_string(),
            tool_calls: Vec::new(),
        },
    }
}

fn classify_response(prompt: &str) -> ChatResponse {
    let lower = prompt.to_ascii_lowercase();
    let agent_type = if lower.contains("scheduling") || lower.contains("meeting") || lower.contains("interview") {
        "scheduler"
    } else if lower.contains("marketing") || lower.contains("newsletter") || lower.contains("fyi") || lower.contains("shipping") {
        "no_response"
    } else if lower.contains("information") || lower.contains("support") || lower.contains("quote") || lower.contains("feature") {
        "info_responder"
    } else {
        "general_responder"
    };

    ChatResponse {
        text: format!(
            r#"{{"agent_type": "{agent_type}", "confidence": 0.82, "reasoning": "mock classifier", "suggested_action": "respond"}}"#
        ),
        tool_calls: Vec::new(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
