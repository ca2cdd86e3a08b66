/// Orchestration Graph (§4.9): START -> fetch_tone -> classify ->
/// {schedule | info | general | no_response} -> compose -> END, driven as a
/// plain Rust state machine rather than a generic graph-execution library —
/// an enum of node names plus a `match` driving a loop, mirroring how the
/// reference crate's own task orchestrator drives `execute()` through
/// sequential stages with `tracing::info!`/`tracing::error!` spans and an
/// `Instant` duration per stage.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use replyforge_classifier::IntentClassifier;
use replyforge_composer::Composer;
use replyforge_core::{
    AgentKind, CalendarProvider, ConsentGate, DraftResponse, EmbeddingProvider, EngineConfig,
    LlmProvider, MailProvider, ResponseType, WebSearchProvider,
};
use replyforge_responders::{GeneralResponder, InformationResponder};
use replyforge_retrieval::{user_kb_dir, Chunker, KnowledgeBaseIndexBuilder, ToneIndexBuilder};
use replyforge_scheduler::SchedulerAgent;
use tracing::{error, info, warn};

use crate::state::{GenerateRequest, GraphState};

enum Node {
    FetchTone,
    Classify,
    Schedule,
    Info,
    General,
    NoResponse,
    Compose,
}

/// Wires the five provider collaborators and owns the engine configuration.
/// One `Orchestrator` serves arbitrarily many concurrent `generate_response`
/// calls; each call owns an independent `GraphState` and independent
/// retrievers (§5, "Scheduling model").
pub struct Orchestrator {
    llm: Arc<dyn LlmProvider>,
    embeddings: Arc<dyn EmbeddingProvider>,
    mail: Arc<dyn MailProvider>,
    calendar: Arc<dyn CalendarProvider>,
    web: Arc<dyn WebSearchProvider>,
    consent: ConsentGate,
    config: EngineConfig,
    kb_root: PathBuf,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
        mail: Arc<dyn MailProvider>,
        calendar: Arc<dyn CalendarProvider>,
        web: Arc<dyn WebSearchProvider>,
        config: EngineConfig,
        kb_root: impl Into<PathBuf>,
    ) -> Self {
        let consent = ConsentGate::new(config.consent.hmac_secret.clone());
        Self {
            llm,
            embeddings,
            mail,
            calendar,
            web,
            consent,
            config,
            kb_root: kb_root.into(),
        }
    }

    fn chunker(&self) -> Chunker {
        Chunker::new(self.config.retrieval.chunk_size, self.config.retrieval.chunk_overlap)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.network.provider_timeout_secs)
    }

    /// The orchestration entrypoint (§6). Validates consent before any
    /// provider call (§8 invariant #3), skips the knowledge base entirely
    /// when its consent scope is absent or invalid (§8 invariant #4), and
    /// drives the graph to completion or forced cancellation.
    pub async fn generate_response(&self, request: GenerateRequest) -> DraftResponse {
        if let Err(err) = self.consent.validate(
            &request.primary_token,
            &self.config.consent.primary_scope,
            &request.user_id,
        ) {
            warn!(error = %err, user_id = %request.user_id, "primary consent validation failed");
            return DraftResponse::error(format!("consent denied: {err}"));
        }

        let mut state = GraphState::new(request);

        if let Some(kb_token) = state.request.kb_token.clone() {
            match self
                .consent
                .validate(&kb_token, &self.config.consent.kb_scope, &state.request.user_id)
            {
                Ok(_) => state.kb_dir = Some(user_kb_dir(&self.kb_root, &state.request.user_id)),
                Err(err) => {
                    info!(error = %err, "knowledge base consent absent or invalid, continuing without it");
                }
            }
        }

        let mut node = Node::FetchTone;
        loop {
            if state.request.cancellation.is_cancelled() {
                warn!("run cancelled, emitting no partial draft");
                return DraftResponse::error("request cancelled");
            }

            node = match node {
                Node::FetchTone => {
                    self.node_fetch_tone(&mut state).await;
                    Node::Classify
                }
                Node::Classify => {
                    self.node_classify(&mut state).await;
                    match state.plan.as_ref().expect("classify always sets a plan").agent_kind {
                        AgentKind::Scheduler => Node::Schedule,
                        AgentKind::InfoResponder => Node::Info,
                        AgentKind::GeneralResponder => Node::General,
                        AgentKind::NoResponse => Node::NoResponse,
                    }
                }
                Node::Schedule => {
                    self.node_schedule(&mut state).await;
                    Node::Compose
                }
                Node::Info => {
                    self.node_info(&mut state).await;
                    Node::Compose
                }
                Node::General => {
                    self.node_general(&mut state).await;
                    Node::Compose
                }
                Node::NoResponse => return DraftResponse::no_response(),
                Node::Compose => return self.node_compose(&mut state).await,
            };
        }
    }

    async fn node_fetch_tone(&self, state: &mut GraphState) {
        let start = Instant::now();
        let builder = ToneIndexBuilder::new(
            self.chunker(),
            self.embeddings.clone(),
            self.config.retrieval.top_k,
            self.config.retrieval.tone_window_days,
        );
        state.tone_retriever = match tokio::time::timeout(self.timeout(), builder.build(self.mail.as_ref())).await {
            Ok(retriever) => retriever,
            Err(_) => {
                warn!(node = "fetch_tone", "timed out building tone index, continuing without it");
                None
            }
        };

        if let Some(dir) = state.kb_dir.clone() {
            let kb_builder = KnowledgeBaseIndexBuilder::new(self.chunker(), self.embeddings.clone(), self.config.retrieval.top_k);
            state.kb_retriever = match tokio::time::timeout(self.timeout(), kb_builder.build(&dir)).await {
                Ok(retriever) => retriever,
                Err(_) => {
                    warn!(node = "fetch_tone", "timed out building knowledge base index, continuing without it");
                    None
                }
            };
        }

        info!(node = "fetch_tone", duration_ms = start.elapsed().as_millis(), "node complete");
    }

    async fn node_classify(&self, state: &mut GraphState) {
        let start = Instant::now();
        let plan = IntentClassifier::new()
            .classify(&state.request.email, &state.request.history, self.llm.as_ref())
            .await;
        info!(
            node = "classify",
            agent_kind = ?plan.agent_kind,
            confidence = plan.confidence,
            duration_ms = start.elapsed().as_millis(),
            "node complete"
        );
        state.plan = Some(plan);
    }

    async fn node_schedule(&self, state: &mut GraphState) {
        let start = Instant::now();
        let agent = SchedulerAgent::new(
            self.llm.as_ref(),
            self.calendar.as_ref(),
            self.config.scheduler.max_iterations,
            self.config.scheduler.message_window,
        );
        let outcome = agent
            .run(
                &state.request.email.body,
                state.request.user_hint.as_deref(),
                &state.request.email.sender_address,
                &state.request.user_id,
            )
            .await;
        info!(node = "schedule", duration_ms = start.elapsed().as_millis(), "node complete");
        state.outcome = Some(outcome);
    }

    async fn node_info(&self, state: &mut GraphState) {
        let start = Instant::now();
        let responder = InformationResponder::new(self.chunker(), self.config.retrieval.top_k);
        let query = format!("{}\n\n{}", state.request.email.subject, state.request.email.body);
        let outcome = responder
            .respond(
                &query,
                state.request.doc.as_ref(),
                state.kb_retriever.as_ref(),
                state.kb_dir.as_deref(),
                self.embeddings.clone(),
                self.web.as_ref(),
                self.llm.as_ref(),
            )
            .await;
        info!(node = "info", duration_ms = start.elapsed().as_millis(), "node complete");
        state.outcome = Some(outcome);
    }

    async fn node_general(&self, state: &mut GraphState) {
        let start = Instant::now();
        let outcome = GeneralResponder::new()
            .respond(&state.request.email, &state.request.history, state.request.user_hint.as_deref(), self.llm.as_ref())
            .await;
        info!(node = "general", duration_ms = start.elapsed().as_millis(), "node complete");
        state.outcome = Some(outcome);
    }

    async fn node_compose(&self, state: &mut GraphState) -> DraftResponse {
        let start = Instant::now();
        let plan = state.plan.take().expect("compose only runs after classify");
        let outcome = match state.outcome.take() {
            Some(outcome) => outcome,
            None => {
                error!(node = "compose", "no sub-agent outcome to compose");
                return DraftResponse::error("internal error: no sub-agent outcome");
            }
        };

        let message = Composer::new()
            .compose(
                &outcome.text,
                &state.request.email,
                state.tone_retriever.as_ref(),
                &state.request.user_name,
                self.llm.as_ref(),
            )
            .await;

        info!(node = "compose", duration_ms = start.elapsed().as_millis(), "node complete");

        DraftResponse {
            response_type: ResponseType::from(plan.agent_kind),
            message,
            reasoning: plan.reasoning,
            confidence: plan.confidence,
            attachment: outcome.attachment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use replyforge_core::{
        BusyRange, CalendarEvent, ChatRequest, ChatResponse, ConversationMessage, EmailContext,
        ProviderError, SentMessage, UnreadMessage, WebSearchResult,
    };

    struct StubLlm;

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            if last.contains("agent_type") {
                return Ok(ChatResponse {
                    text: r#"{"agent_type": "general_responder", "confidence": 0.9, "reasoning": "chit-chat", "suggested_action": "reply"}"#.to_string(),
                    tool_calls: Vec::new(),
                });
            }
            Ok(ChatResponse {
                text: "Thanks for your note, happy to help. Best, Alex".to_string(),
                tool_calls: Vec::new(),
            })
        }
    }

    struct EmptyEmbedder;

    #[async_trait]
    impl EmbeddingProvider for EmptyEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct EmptyMail;

    #[async_trait]
    impl MailProvider for EmptyMail {
        async fn list_unread_since(&self, _since: DateTime<Utc>) -> Result<Vec<UnreadMessage>, ProviderError> {
            Ok(Vec::new())
        }
        async fn fetch_message(&self, _id: &str) -> Result<UnreadMessage, ProviderError> {
            Err(ProviderError::Empty)
        }
        async fn fetch_thread(&self, _thread_id: &str) -> Result<Vec<ConversationMessage>, ProviderError> {
            Ok(Vec::new())
        }
        async fn list_sent_since(&self, _since: DateTime<Utc>) -> Result<Vec<SentMessage>, ProviderError> {
            Ok(Vec::new())
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

    struct EmptyCalendar;

    #[async_trait]
    impl CalendarProvider for EmptyCalendar {
        async fn free_busy(&self, _email: &str, _start: DateTime<Utc>, _end: DateTime<Utc>) -> Result<Vec<BusyRange>, ProviderError> {
            Ok(Vec::new())
        }
        async fn insert_event(
            &self,
            summary: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            _attendees: &[String],
            _description: Option<&str>,
        ) -> Result<CalendarEvent, ProviderError> {
            Ok(CalendarEvent {
                id: "evt-1".to_string(),
                summary: summary.to_string(),
                start,
                end,
                link: "https://calendar.example/evt-1".to_string(),
            })
        }
        async fn list_upcoming(&self, _max_results: u32) -> Result<Vec<CalendarEvent>, ProviderError> {
            Ok(Vec::new())
        }
        async fn update_event(&self, event_id: &str, new_start: DateTime<Utc>, new_end: DateTime<Utc>) -> Result<CalendarEvent, ProviderError> {
            Ok(CalendarEvent {
                id: event_id.to_string(),
                summary: "Updated".to_string(),
                start: new_start,
                end: new_end,
                link: "https://calendar.example/updated".to_string(),
            })
        }
        async fn delete_event(&self, _event_id: &str) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    struct EmptyWeb;

    #[async_trait]
    impl WebSearchProvider for EmptyWeb {
        async fn search(&self, _query: &str) -> Result<Vec<WebSearchResult>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn orchestrator(kb_root: &std::path::Path) -> Orchestrator {
        Orchestrator::new(
            Arc::new(StubLlm),
            Arc::new(EmptyEmbedder),
            Arc::new(EmptyMail),
            Arc::new(EmptyCalendar),
            Arc::new(EmptyWeb),
            EngineConfig::default(),
            kb_root,
        )
    }

    fn email() -> EmailContext {
        EmailContext::new("Hi", "Jane Doe <jane@x.com>", "jane@x.com", "Just saying hello").with_summary("summary", "Personal message not related to work")
    }

    #[tokio::test]
    async fn invalid_primary_consent_short_circuits_before_any_node_runs() {
        let dir = tempfile::TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let request = GenerateRequest::new(email(), "not-a-real-token", "user-1", "Alex");
        let draft = orchestrator.generate_response(request).await;
        assert_eq!(draft.response_type, ResponseType::Error);
    }

    #[tokio::test]
    async fn valid_consent_drives_graph_to_a_composed_reply() {
        let dir = tempfile::TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let gate = ConsentGate::new(EngineConfig::default().consent.hmac_secret);
        let token = gate.issue("user-1", "vault.read.email", 3600);

        let request = GenerateRequest::new(email(), token, "user-1", "Alex");
        let draft = orchestrator.generate_response(request).await;

        assert_eq!(draft.response_type, ResponseType::GeneralResponder);
        assert!(draft.message.contains("Jane Doe"));
        assert!(draft.attachment.is_none());
    }

    #[tokio::test]
    async fn no_response_intent_bypasses_composer_and_returns_fixed_sentinel() {
        let dir = tempfile::TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let gate = ConsentGate::new(EngineConfig::default().consent.hmac_secret);
        let token = gate.issue("user-1", "vault.read.email", 3600);

        let mut marketing_email = email();
        marketing_email.intent = "Marketing emails or newsletters".to_string();
        let request = GenerateRequest::new(marketing_email, token, "user-1", "Alex");
        let draft = orchestrator.generate_response(request).await;

        assert_eq!(draft.response_type, ResponseType::NoResponse);
        assert_eq!(draft.message, replyforge_core::NO_RESPONSE_SENTINEL);
        assert!(draft.attachment.is_none());
    }

    #[tokio::test]
    async fn missing_kb_consent_leaves_kb_directory_unread() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("should-not-be-read.txt"), "secret").unwrap();
        let orchestrator = orchestrator(dir.path());
        let gate = ConsentGate::new(EngineConfig::default().consent.hmac_secret);
        let token = gate.issue("user-1", "vault.read.email", 3600);

        let request = GenerateRequest::new(email(), token, "user-1", "Alex");
        let draft = orchestrator.generate_response(request).await;
        assert_ne!(draft.response_type, ResponseType::Error);
    }

    #[tokio::test]
    async fn cancelled_request_returns_no_partial_draft() {
        let dir = tempfile::TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let gate = ConsentGate::new(EngineConfig::default().consent.hmac_secret);
        let token = gate.issue("user-1", "vault.read.email", 3600);

        let cancellation = tokio_util::sync::CancellationToken::new();
        cancellation.cancel();
        let request = GenerateRequest::new(email(), token, "user-1", "Alex").with_cancellation(cancellation);
        let draft = orchestrator.generate_response(request).await;
        assert_eq!(draft.response_type, ResponseType::Error);
    }

    #[tokio::test]
    async fn running_the_graph_twice_on_identical_input_is_deterministic() {
        let dir = tempfile::TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let gate = ConsentGate::new(EngineConfig::default().consent.hmac_secret);
        let token = gate.issue("user-1", "vault.read.email", 3600);

        let first = orchestrator
            .generate_response(GenerateRequest::new(email(), token.clone(), "user-1", "Alex"))
            .await;
        let second = orchestrator
            .generate_response(GenerateRequest::new(email(), token, "user-1", "Alex"))
            .await;

        assert_eq!(first.response_type, second.response_type);
        assert_eq!(first.message, second.message);
        assert_eq!(first.confidence, second.confidence);
    }
}
