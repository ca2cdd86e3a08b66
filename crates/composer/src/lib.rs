/// ReplyForge Composer
///
/// The final stage of the orchestration graph (§4.8): turns a sub-agent's
/// outcome into a tone-matched, addressed email body.
pub use compose::Composer;

pub mod compose;
