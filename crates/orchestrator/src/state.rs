/// The orchestration graph's per-request input and mutable state (§3, §4.9).
/// `GraphState` is owned for the lifetime of one `generate_response` call;
/// later nodes only read fields populated by earlier ones.
use std::path::PathBuf;

use replyforge_core::{AgentOutcome, ConversationMessage, EmailContext, ResponsePlan};
use replyforge_responders::UploadedDoc;
use replyforge_retrieval::Retriever;
use tokio_util::sync::CancellationToken;

/// Caller-supplied input to one graph invocation (§6's `generate_response`).
pub struct GenerateRequest {
    pub email: EmailContext,
    pub primary_token: String,
    pub kb_token: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub user_hint: Option<String>,
    pub doc: Option<UploadedDoc>,
    pub history: Vec<ConversationMessage>,
    pub cancellation: CancellationToken,
}

impl GenerateRequest {
    pub fn new(email: EmailContext, primary_token: impl Into<String>, user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            email,
            primary_token: primary_token.into(),
            kb_token: None,
            user_id: user_id.into(),
            user_name: user_name.into(),
            user_hint: None,
            doc: None,
            history: Vec::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_kb_token(mut self, token: impl Into<String>) -> Self {
        self.kb_token = Some(token.into());
        self
    }

    pub fn with_user_hint(mut self, hint: impl Into<String>) -> Self {
        self.user_hint = Some(hint.into());
        self
    }

    pub fn with_doc(mut self, doc: UploadedDoc) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn with_history(mut self, history: Vec<ConversationMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

/// The state map mutated across the graph's nodes (§4.9 implementation
/// shape note). `kb_dir` is `Some` only once KB consent has validated.
pub struct GraphState {
    pub request: GenerateRequest,
    pub kb_dir: Option<PathBuf>,
    pub tone_retriever: Option<Retriever>,
    pub kb_retriever: Option<Retriever>,
    pub plan: Option<ResponsePlan>,
    pub outcome: Option<AgentOutcome>,
}

impl GraphState {
    pub fn new(request: GenerateRequest) -> Self {
        Self {
            request,
            kb_dir: None,
            tone_retriever: None,
            kb_retriever: None,
            plan: None,
            outcome: None,
        }
    }
}
