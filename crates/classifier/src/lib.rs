/// ReplyForge Classifier
///
/// The Intent Classifier (§4.2): a static intent-label fallback table plus
/// a language-model override, producing the `ResponsePlan` the
/// orchestration graph routes on.
pub use classify::IntentClassifier;
pub use intent_map::{parse_agent_kind, static_agent_kind};

pub mod classify;
pub mod intent_map;
