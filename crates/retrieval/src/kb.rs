/// Knowledge-Base Index Builder (§4.4): scans a per-user directory of
/// PDF/DOCX/TXT/MD files, extracts text per extension, and builds an
/// ephemeral retriever over the result. Gated by the `knowledge.base.read`
/// consent scope one level up, in the orchestrator — this builder is only
/// ever invoked once that scope has validated, so the directory is only
/// ever read when KB consent is present (§8 invariant #4; see DESIGN.md).
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use replyforge_core::{sanitize_user_key, EmbeddingProvider};
use tracing::{debug, warn};

use crate::chunk::Chunker;
use crate::index::Retriever;

/// Resolves the sanitized per-user directory under `kb_root`.
pub fn user_kb_dir(kb_root: &Path, user_email: &str) -> PathBuf {
    kb_root.join(sanitize_user_key(user_email))
}

pub struct KnowledgeBaseIndexBuilder {
    chunker: Chunker,
    embeddings: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl KnowledgeBaseIndexBuilder {
    pub fn new(chunker: Chunker, embeddings: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            chunker,
            embeddings,
            top_k,
        }
    }

    /// Builds a retriever over every regular file in `dir`, one document
    /// per file, metadata carrying the original filename. Returns `None`
    /// if the directory is empty, missing, or every file fails to parse.
    pub async fn build(&self, dir: &Path) -> Option<Retriever> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "knowledge base directory unreadable");
                return None;
            }
        };

        let mut documents = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match extract_file_text(&path) {
                Ok(Some(text)) => {
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    documents.push((text, Some(filename)));
                }
                Ok(None) => {
                    debug!(path = %path.display(), "skipped file with unsupported extension");
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to extract knowledge base file");
                }
            }
        }

        match Retriever::build(&documents, &self.chunker, self.embeddings.clone(), self.top_k).await {
            Ok(retriever) => retriever,
            Err(err) => {
                warn!(error = %err, "failed to embed knowledge base documents");
                None
            }
        }
    }
}

/// Extracts text from one file by extension. Returns `Ok(None)` for
/// extensions outside `.pdf`/`.docx`/`.txt`/`.md` (§4.4: "Other extensions
/// -> skipped").
fn extract_file_text(path: &Path) -> anyhow::Result<Option<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => Ok(Some(extract_pdf_text(path)?)),
        Some("docx") => Ok(Some(extract_docx_text(path)?)),
        Some("txt") | Some("md") => {
            let bytes = std::fs::read(path)?;
            Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
        }
        _ => Ok(None),
    }
}

fn extract_pdf_text(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)?;
    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow::anyhow!("pdf extraction failed: {e}"))
}

fn extract_docx_text(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)?;
    let docx = read_docx(&bytes).map_err(|e| anyhow::anyhow!("docx parse failed: {e}"))?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for run_child in paragraph.children {
                if let ParagraphChild::Run(run) = run_child {
                    for part in run.children {
                        if let RunChild::Text(text) = part {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }
    Ok(paragraphs.join("\n"))
}
