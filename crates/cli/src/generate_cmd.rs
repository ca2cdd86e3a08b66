/// `replyforge generate` — runs one email through the orchestration graph
/// against the deterministic mock providers, auto-issuing the consent
/// tokens a real HTTP layer would obtain from its own auth flow. The CLI's
/// counterpart to the reference crate's own `run` command.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use replyforge_core::{ConsentGate, EmailContext, EngineConfig};
use replyforge_orchestrator::{GenerateRequest, Orchestrator};
use replyforge_providers_mock::{
    MockCalendarProvider, MockEmbeddingProvider, MockLlmProvider, MockMailProvider, MockWebSearchProvider,
};

pub struct GenerateArgs {
    pub subject: String,
    pub from: String,
    pub body: String,
    pub user_id: String,
    pub user_name: String,
    pub user_hint: Option<String>,
    pub config_path: Option<PathBuf>,
    pub kb_root: Option<PathBuf>,
    pub json: bool,
}

pub async fn generate(args: GenerateArgs) -> Result<()> {
    let config = match &args.config_path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let kb_root = args.kb_root.unwrap_or_else(std::env::temp_dir);
    let sender_address = EmailContext::extract_address(&args.from);
    let email = EmailContext::new(&args.subject, &args.from, sender_address, &args.body);

    let orchestrator = build_orchestrator(config.clone(), &kb_root);
    let token = ConsentGate::new(config.consent.hmac_secret.clone()).issue(&args.user_id, &config.consent.primary_scope, 3600);

    let mut request = GenerateRequest::new(email, token, &args.user_id, &args.user_name);
    if let Some(hint) = args.user_hint {
        request = request.with_user_hint(hint);
    }

    let draft = orchestrator.generate_response(request).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
    } else {
        println!("response_type: {:?}", draft.response_type);
        println!("confidence:    {:.2}", draft.confidence);
        println!("reasoning:     {}", draft.reasoning);
        println!();
        println!("{}", draft.message);
        if let Some(attachment) = &draft.attachment {
            println!();
            println!("[attachment: {} ({} bytes)]", attachment.filename, attachment.bytes.len());
        }
    }

    Ok(())
}

pub fn build_orchestrator(config: EngineConfig, kb_root: &Path) -> Orchestrator {
    Orchestrator::new(
        Arc::new(MockLlmProvider::new()),
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(MockMailProvider::new()),
        Arc::new(MockCalendarProvider::new()),
        Arc::new(MockWebSearchProvider::new()),
        config,
        kb_root,
    )
}
