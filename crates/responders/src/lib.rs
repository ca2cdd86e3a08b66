/// ReplyForge Responders
///
/// The two non-scheduling sub-agents (§4.6, §4.7): the Information
/// Responder, which assembles document/knowledge-base/web context before
/// generation, and the General Responder, a single contextualized call.
pub use general::GeneralResponder;
pub use info::{InformationResponder, UploadedDoc};

pub mod general;
pub mod info;
