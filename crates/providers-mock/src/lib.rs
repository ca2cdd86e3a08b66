/// ReplyForge Mock Providers
///
/// Deterministic stand-ins for the five external collaborators (§6), in the
/// reference crate's own local-stub idiom: no network calls, fixed or
/// configurable canned data, safe for the CLI demo and for every test in
/// this workspace that does not need to exercise a real backend.
pub use calendar::MockCalendarProvider;
pub use embedding::MockEmbeddingProvider;
pub use llm::MockLlmProvider;
pub use mail::{MockMailProvider, SentRecord};
pub use web::MockWebSearchProvider;

pub mod calendar;
pub mod embedding;
pub mod llm;
pub mod mail;
pub mod web;
