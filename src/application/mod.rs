//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! backends, so the vendor client can be swapped out in tests.

pub mod services;

pub use services::RetrievalService;
