/// `replyforge demo` — drives the built-in fixture inbox through the full
/// orchestration graph against the mock providers, printing one draft per
/// fixture so every routing path (scheduler, info, general, no-response) is
/// visible in a single run.
use anyhow::Result;
use replyforge_core::{ConsentGate, EngineConfig};
use replyforge_orchestrator::GenerateRequest;

use crate::fixtures;
use crate::generate_cmd::build_orchestrator;

pub async fn demo() -> Result<()> {
    let config = EngineConfig::default();
    let kb_root = tempfile::tempdir()?;
    let orchestrator = build_orchestrator(config.clone(), kb_root.path());
    let gate = ConsentGate::new(config.consent.hmac_secret.clone());
    let token = gate.issue("demo-user", &config.consent.primary_scope, 3600);

    for fixture in fixtures::inbox() {
        let request = GenerateRequest::new(fixture.email, token.clone(), "demo-user", "Alex");
        let draft = orchestrator.generate_response(request).await;

        println!("=== {} ===", fixture.label);
        println!("response_type: {:?}", draft.response_type);
        println!("confidence:    {:.2}", draft.confidence);
        println!("{}", draft.message);
        println!();
    }

    Ok(())
}
