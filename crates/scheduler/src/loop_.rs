/// The scheduler's tool-calling loop (§4.5, §9): a tagged-union state
/// (`AwaitingModel | DispatchingTools | Done`) that dispatches tool calls
/// sequentially and re-enters the model with a bounded trailing message
/// window, terminating when the model responds with no tool calls or when
/// the configured iteration cap is reached.
use chrono::Utc;
use replyforge_core::{AgentOutcome, CalendarProvider, ChatMessage, ChatRequest, LlmProvider, ToolCall};
use tracing::{info, warn};

use crate::tools::{dispatch, tool_definitions};

/// Tagged-union loop state, named directly per SPEC_FULL.md §9.
enum LoopState {
    AwaitingModel,
    DispatchingTools(Vec<ToolCall>),
    Done(String),
}

pub struct SchedulerAgent<'a> {
    pub llm: &'a dyn LlmProvider,
    pub calendar: &'a dyn CalendarProvider,
    pub max_iterations: u32,
    pub message_window: usize,
}

impl<'a> SchedulerAgent<'a> {
    pub fn new(
        llm: &'a dyn LlmProvider,
        calendar: &'a dyn CalendarProvider,
        max_iterations: u32,
        message_window: usize,
    ) -> Self {
        Self {
            llm,
            calendar,
            max_iterations,
            message_window,
        }
    }

    /// Runs the loop to completion (or forced termination) and returns the
    /// agent's final text as an `AgentOutcome`.
    pub async fn run(
        &self,
        email_body: &str,
        user_hint: Option<&str>,
        sender_email: &str,
        user_email: &str,
    ) -> AgentOutcome {
        let mut history = vec![
            ChatMessage::system(system_prompt(user_email)),
            ChatMessage::user(initial_user_message(email_body, user_hint, sender_email, user_email)),
        ];

        let mut state = LoopState::AwaitingModel;
        let mut iterations = 0u32;
        let mut last_text = String::new();

        loop {
            state = match state {
                LoopState::Done(text) => break AgentOutcome::text_only(text),
                LoopState::AwaitingModel => {
                    if iterations >= self.max_iterations {
                        warn!(iterations, "scheduler loop hit max iterations, forcing stop");
                        break AgentOutcome::text_only(forced_stop_message(&last_text));
                    }
                    iterations += 1;

                    let window = trailing_window(&history, self.message_window);
                    let request = ChatRequest::new(window).with_tools(tool_definitions());
                    let response = match self.llm.chat(request).await {
                        Ok(response) => response,
                        Err(err) => {
                            warn!(error = %err, "scheduler LLM call failed");
                            break AgentOutcome::text_only(format!(
                                "Unable to complete scheduling: {err}"
                            ));
                        }
                    };

                    last_text = response.text.clone();
                    if !response.text.is_empty() {
                        history.push(ChatMessage::assistant(response.text.clone()));
                    }

                    if response.has_tool_calls() {
                        LoopState::DispatchingTools(response.tool_calls)
                    } else {
                        LoopState::Done(response.text)
                    }
                }
                LoopState::DispatchingTools(calls) => {
                    for call in &calls {
                        let result = dispatch(call, self.calendar).await;
                        info!(tool = %call.name, "dispatched scheduler tool");
                        history.push(ChatMessage::tool_result(call.id.clone(), result));
                    }
                    LoopState::AwaitingModel
                }
            };
        }
    }
}

fn system_prompt(user_email: &str) -> String {
    let now = Utc::now();
    let tomorrow = now + chrono::Duration::days(1);
    format!(
        "You are a scheduling assistant. Today's date is {today}. Tomorrow's date is {tomorrow}. \
         Check only the calendar of {user_email}; the sender's calendar is assumed available. \
         If the user is asking to change an existing meeting, cancel the original event before \
         scheduling the new one.",
        today = now.format("%Y-%m-%d"),
        tomorrow = tomorrow.format("%Y-%m-%d"),
        user_email = user_email,
    )
}

fn initial_user_message(
    email_body: &str,
    user_hint: Option<&str>,
    sender_email: &str,
    user_email: &str,
) -> String {
    let hint_block = user_hint
        .map(|h| format!("\nUser suggestion: {h}"))
        .unwrap_or_default();
    format!(
        "Email from {sender_email} (assumed available), for calendar owner {user_email}:\n{email_body}{hint_block}"
    )
}

fn forced_stop_message(last_text: &str) -> String {
    if last_text.is_empty() {
        "Scheduling could not be completed within the allotted steps.".to_string()
    } else {
        last_text.to_string()
    }
}

/// Returns the last `window` messages, preserving order. The full history
/// is retained by the caller; only this slice is sent to the model.
fn trailing_window(history: &[ChatMessage], window: usize) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(window);
    history[start..].to_vec()
}
