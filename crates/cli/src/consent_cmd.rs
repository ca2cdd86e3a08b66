/// `replyforge consent issue` — mints a signed consent token against a
/// config file's HMAC secret, for feeding into `replyforge generate`.
use std::path::Path;

use anyhow::{bail, Result};
use replyforge_core::{ConsentGate, EngineConfig};

pub enum Scope {
    Primary,
    Kb,
}

impl Scope {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "primary" => Some(Scope::Primary),
            "kb" => Some(Scope::Kb),
            _ => None,
        }
    }
}

pub fn issue(config_path: Option<&Path>, user_id: &str, scope: Scope, ttl_secs: i64) -> Result<()> {
    let config = match config_path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    if config_path.is_none() {
        eprintln!("warning: no --config given, issuing against the built-in demo secret");
    }

    let scope_name = match scope {
        Scope::Primary => &config.consent.primary_scope,
        Scope::Kb => &config.consent.kb_scope,
    };

    if ttl_secs <= 0 {
        bail!("--ttl-secs must be positive");
    }

    let gate = ConsentGate::new(config.consent.hmac_secret.clone());
    let token = gate.issue(user_id, scope_name, ttl_secs);
    println!("{token}");
    Ok(())
}
