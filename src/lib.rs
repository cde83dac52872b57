//! MCP-style retrieval gateway over a hosted assistant / vector store.
//!
//! Exposes two tools, `search` and `fetch`, over an HTTP JSON-RPC
//! endpoint, plus health, readiness and direct tool routes for
//! deployment checks. All search and storage is delegated to the
//! external backend; this crate only validates, forwards and reshapes.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
