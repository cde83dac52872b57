use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One citation fragment extracted from a backend answer.
///
/// `filename` and `excerpt` are optional because the vendor does not
/// guarantee either; the retrieval service fills the gaps when shaping
/// the public result schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub file_id: String,
    pub filename: Option<String>,
    pub excerpt: Option<String>,
}

/// Assistant response to a search query: the answer text plus the
/// citations backing it, in backend order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// A file retrieved in full from the backend store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub content: String,
    pub metadata: BTreeMap<String, String>,
}

/// Summary of the configured vector store, used by the readiness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub id: String,
    pub name: String,
    pub total_files: u64,
}
