/// ReplyForge CLI
///
/// A demo harness that exercises the orchestration engine end to end
/// against the deterministic mock providers (§2 #11 of the engine spec) —
/// useful for local exploration and as an integration-test fixture, not
/// itself part of the engine's specified surface.
pub mod config_cmd;
pub mod consent_cmd;
pub mod demo_cmd;
pub mod fixtures;
pub mod generate_cmd;
