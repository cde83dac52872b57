use async_trait::async_trait;

use crate::domain::{errors::DomainError, AssistantAnswer, StoreStatus, StoredFile};

/// Outbound port to the hosted assistant / vector-store service.
///
/// Implementations own the wire protocol; callers only see domain shapes.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Run the query against the configured assistant and collect the
    /// answer plus its citations.
    async fn ask(&self, query: &str) -> Result<AssistantAnswer, DomainError>;

    /// Retrieve the full content and metadata of a stored file.
    async fn retrieve_file(&self, id: &str) -> Result<StoredFile, DomainError>;

    /// Probe the configured vector store.
    async fn store_status(&self) -> Result<StoreStatus, DomainError>;
}
