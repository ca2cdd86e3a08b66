/// ReplyForge Orchestrator
///
/// The Orchestration Graph (§4.9) and the upstream email-list summarizer
/// (§2 #12): the two components that wire every other crate in this
/// workspace into the single `generate_response` entrypoint (§6).
pub use graph::Orchestrator;
pub use state::{GenerateRequest, GraphState};
pub use summarizer::EmailSummarizer;

pub mod graph;
pub mod state;
pub mod summarizer;
