/// `replyforge config init` — writes a default `EngineConfig` to a YAML
/// file, the CLI's counterpart to the reference crate's own `init` command.
use std::path::Path;

use anyhow::{bail, Result};
use replyforge_core::EngineConfig;

pub fn init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", output.display());
    }

    let config = EngineConfig::default();
    config.to_file(output)?;

    println!("Wrote default configuration to {}", output.display());
    println!("Edit consent.hmac_secret before using this config outside local demos.");
    Ok(())
}
