pub mod health;
pub mod mcp;
pub mod tools;

use axum::http::{header, Method};
use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Some MCP clients post to the trailing-slash variant.
        .route("/sse", post(mcp::handle_rpc))
        .route("/sse/", post(mcp::handle_rpc))
        .route("/search", post(tools::search_handler))
        .route("/fetch", post(tools::fetch_handler))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors())
        .with_state(state)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(Any)
}
