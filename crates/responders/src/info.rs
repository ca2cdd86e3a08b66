/// Information Responder (§4.6): assembles document, knowledge-base, and
/// web context around the query, then asks the language model to compose
/// an answer, optionally naming one of those sources as an attachment.
use std::path::Path;
use std::sync::Arc;

use replyforge_core::text::{extract_attach_file, strip_attach_file, strip_think_block};
use replyforge_core::{AgentOutcome, Attachment, ChatMessage, ChatRequest, EmbeddingProvider, LlmProvider, WebSearchProvider};
use replyforge_retrieval::{Chunker, Retriever};
use tracing::{info, warn};

const KNOWN_TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "json"];

/// A document attached to the originating email, passed in verbatim; the
/// responder decides whether it can be read as text or only noted as binary.
#[derive(Clone, Debug)]
pub struct UploadedDoc {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct InformationResponder {
    chunker: Chunker,
    top_k: usize,
}

impl InformationResponder {
    pub fn new(chunker: Chunker, top_k: usize) -> Self {
        Self { chunker, top_k }
    }

    /// Produces the sub-agent's answer. `kb_dir` is `Some` only once the
    /// knowledge-base consent scope has validated one layer up; the
    /// attachment-resolution step only ever reads from it when present.
    pub async fn respond(
        &self,
        query: &str,
        doc: Option<&UploadedDoc>,
        kb_retriever: Option<&Retriever>,
        kb_dir: Option<&Path>,
        embeddings: Arc<dyn EmbeddingProvider>,
        web: &dyn WebSearchProvider,
        llm: &dyn LlmProvider,
    ) -> AgentOutcome {
        let doc_context = self.document_context(query, doc, embeddings).await;
        let kb_context = kb_context(query, kb_retriever).await;
        let web_context = web_context(query, web).await;

        let prompt = build_prompt(query, doc_context.as_deref(), kb_context.as_deref(), web_context.as_deref());
        let response = match llm.chat(ChatRequest::new(vec![ChatMessage::user(prompt)])).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "information responder LLM call failed");
                return AgentOutcome::text_only(format!("Unable to compose a response: {err}"));
            }
        };

        let text = strip_think_block(&response.text);
        self.resolve_attachment(&text, doc, kb_dir)
    }

    async fn document_context(
        &self,
        query: &str,
        doc: Option<&UploadedDoc>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Option<String> {
        let doc = doc?;
        let ext = doc
            .filename
            .rsplit('.')
            .next()
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !KNOWN_TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Some(format!("binary file {} was provided", doc.filename));
        }

        let text = String::from_utf8_lossy(&doc.bytes).into_owned();
        let documents = vec![(text, Some(doc.filename.clone()))];
        match Retriever::build(&documents, &self.chunker, embeddings, 3).await {
            Ok(Some(retriever)) => match retriever.query(query).await {
                Ok(chunks) => Some(format_chunks(&chunks)),
                Err(err) => {
                    warn!(error = %err, "failed to query document context");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to embed document context");
                None
            }
        }
    }

    fn resolve_attachment(&self, text: &str, doc: Option<&UploadedDoc>, kb_dir: Option<&Path>) -> AgentOutcome {
        if let Some(doc) = doc {
            let stripped = strip_attach_file(text);
            return AgentOutcome::with_attachment(
                stripped,
                Attachment {
                    filename: doc.filename.clone(),
                    bytes: doc.bytes.clone(),
                },
            );
        }

        let Some(requested) = extract_attach_file(text) else {
            return AgentOutcome::text_only(strip_attach_file(text));
        };

        let resolved = kb_dir.and_then(|dir| std::fs::read(dir.join(&requested)).ok());
        let stripped = strip_attach_file(text);

        match resolved {
            Some(bytes) => {
                info!(filename = %requested, "resolved attachment from knowledge base");
                AgentOutcome::with_attachment(stripped, Attachment { filename: requested, bytes })
            }
            None => AgentOutcome::text_only(format!("{stripped}\n\n(Attachment \"{requested}\" was not found.)")),
        }
    }
}

async fn kb_context(query: &str, retriever: Option<&Retriever>) -> Option<String> {
    let retriever = retriever?;
    match retriever.query(query).await {
        Ok(chunks) => Some(format_chunks(&chunks)),
        Err(err) => {
            warn!(error = %err, "failed to query knowledge base context");
            None
        }
    }
}

async fn web_context(query: &str, web: &dyn WebSearchProvider) -> Option<String> {
    match web.search(query).await {
        Ok(results) => {
            if results.is_empty() {
                return None;
            }
            Some(
                results
                    .iter()
                    .take(5)
                    .map(|r| format!("- {}: {} ({})", r.title, r.snippet, r.link))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        }
        Err(err) => {
            warn!(error = %err, "web search failed, continuing without web context");
            None
        }
    }
}

fn format_chunks(chunks: &[replyforge_retrieval::RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("Source: {}\nContent: {}", c.source.as_deref().unwrap_or("unknown"), c.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_prompt(query: &str, doc: Option<&str>, kb: Option<&str>, web: Option<&str>) -> String {
    let mut sections = vec![format!("Question: {query}")];
    if let Some(doc) = doc {
        sections.push(format!("Document context:\n{doc}"));
    }
    if let Some(kb) = kb {
        sections.push(format!("Knowledge base context:\n{kb}"));
    }
    if let Some(web) = web {
        sections.push(format!("Web context:\n{web}"));
    }
    sections.push(
        "Compose a helpful reply using the context above. If the user explicitly asked for a \
         document, or a knowledge base source is essential to answer, end your reply with a \
         final line of the exact form [ATTACH_FILE: <filename>] naming one of the sources \
         already shown above; otherwise omit that line entirely."
            .to_string(),
    );
    sections.join("\n\n")
}
