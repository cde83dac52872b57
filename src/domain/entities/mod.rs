mod answer;
mod document;

pub use answer::{AssistantAnswer, Citation, StoreStatus, StoredFile};
pub use document::{Document, SearchResult};
