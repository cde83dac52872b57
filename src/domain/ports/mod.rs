mod retrieval;

pub use retrieval::RetrievalBackend;
