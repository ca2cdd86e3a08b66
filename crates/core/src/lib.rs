/// ReplyForge Core
///
/// Foundational types shared across the email orchestration engine: the
/// data model (§3), the Consent Gate (§4.1), the five provider traits
/// (§6), engine configuration, and the error taxonomy (§7).
///
/// # Modules
///
/// - `error`: `EngineError`/`ProviderError` and the `Result` alias
/// - `config`: `EngineConfig` and its sub-configs, loadable from YAML
/// - `consent`: the Consent Gate and its token claims/errors
/// - `email`: `EmailContext`, `ConversationMessage`, sanitized directory keys
/// - `response`: `ResponsePlan`, `AgentOutcome`, `DraftResponse`, `Attachment`
/// - `providers`: `LlmProvider`, `EmbeddingProvider`, `MailProvider`, `CalendarProvider`, `WebSearchProvider`
/// - `text`: think-block stripping, ATTACH_FILE directive handling, JSON extraction
pub use config::EngineConfig;
pub use consent::{ConsentClaims, ConsentError, ConsentGate};
pub use email::{sanitize_user_key, ConversationMessage, EmailContext};
pub use error::{EngineError, ProviderError, Result};
pub use providers::{
    BusyRange, CalendarEvent, CalendarProvider, ChatMessage, ChatRequest, ChatResponse, ChatRole,
    EmbeddingProvider, LlmProvider, MailProvider, SentMessage, ToolCall, ToolDefinition,
    UnreadMessage, WebSearchProvider, WebSearchResult,
};
pub use response::{
    AgentKind, AgentOutcome, Attachment, DraftResponse, ResponsePlan, ResponseType,
    NO_RESPONSE_SENTINEL,
};

pub mod config;
pub mod consent;
pub mod email;
pub mod error;
pub mod providers;
pub mod response;
pub mod text;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_exports_are_accessible_from_crate_root() {
        let _config = EngineConfig::default();
        let _kind = AgentKind::Scheduler;
        let _draft = DraftResponse::no_response();
        let _gate = ConsentGate::new("secret");
    }
}
