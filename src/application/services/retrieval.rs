use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::{
    ports::RetrievalBackend, Citation, Document, DomainError, SearchResult, StoreStatus,
};

/// Longest excerpt surfaced in a search result before truncation.
const EXCERPT_LIMIT: usize = 500;
/// Longest title derived from excerpt text.
const TITLE_LIMIT: usize = 80;

/// Translates tool calls into backend requests and reshapes the answers
/// into the fixed result schema. Stateless apart from the backend handle;
/// concurrent calls never share mutable state.
pub struct RetrievalService {
    backend: Arc<dyn RetrievalBackend>,
}

impl RetrievalService {
    pub fn new(backend: Arc<dyn RetrievalBackend>) -> Self {
        Self { backend }
    }

    /// Forward a free-text query to the assistant and map each citation
    /// to a search result, preserving backend order. Zero citations is a
    /// valid empty outcome, not an error.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::invalid_input("query must be a non-empty string"));
        }

        // Nothing in the search path is caller-addressable, so a vendor
        // 404 here is a backend fault, not a missing document.
        let answer = self.backend.ask(query).await.map_err(|err| match err {
            DomainError::NotFound(msg) => DomainError::backend(msg),
            other => other,
        })?;

        let results: Vec<SearchResult> = answer
            .citations
            .iter()
            .map(|citation| shape_result(citation, &answer.text))
            .collect();

        debug!(count = results.len(), "search completed");
        Ok(results)
    }

    /// Resolve a search result id into the full document.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: &str) -> Result<Document, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::invalid_input("id must be a non-empty string"));
        }

        let file = self.backend.retrieve_file(id).await?;

        let title = if file.filename.is_empty() {
            format!("Document {}", file.id)
        } else {
            file.filename.clone()
        };
        let url = file_url(&file.id);

        Ok(Document::new(file.id, title, file.content, url).with_metadata(file.metadata))
    }

    /// Probe the configured vector store, for the readiness endpoint.
    #[instrument(skip(self))]
    pub async fn store_status(&self) -> Result<StoreStatus, DomainError> {
        self.backend.store_status().await
    }
}

fn shape_result(citation: &Citation, answer_text: &str) -> SearchResult {
    let excerpt = citation
        .excerpt
        .as_deref()
        .filter(|e| !e.trim().is_empty());

    let text = match excerpt {
        Some(e) => e.to_string(),
        None => truncate(answer_text, EXCERPT_LIMIT),
    };

    let title = match citation.filename.as_deref().filter(|f| !f.is_empty()) {
        Some(name) => name.to_string(),
        None => match excerpt {
            Some(e) => truncate(e, TITLE_LIMIT),
            None => format!("Document {}", citation.file_id),
        },
    };

    SearchResult {
        id: citation.file_id.clone(),
        title,
        text,
        url: file_url(&citation.file_id),
    }
}

fn file_url(id: &str) -> String {
    format!("https://platform.openai.com/storage/files/{id}")
}

// Truncation counts chars, not bytes, so multi-byte text never splits.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}
