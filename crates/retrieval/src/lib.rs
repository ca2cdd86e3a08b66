/// ReplyForge Retrieval
///
/// Chunking, the in-memory vector index, and the two index builders
/// specified in §4.3 and §4.4: the Tone Index (recent sent mail) and the
/// Knowledge-Base Index (the user's uploaded reference files).
pub use chunk::Chunker;
pub use index::{RetrievedChunk, Retriever};
pub use kb::{user_kb_dir, KnowledgeBaseIndexBuilder};
pub use tone::ToneIndexBuilder;

pub mod chunk;
pub mod index;
pub mod kb;
pub mod tone;
