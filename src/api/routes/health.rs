use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::domain::StoreStatus;
use crate::infrastructure::ConfigPresence;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub config: ConfigPresence,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub vector_store: StoreStatus,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        config: state.config.presence(),
    })
}

/// Probes the configured vector store through the backend; a gateway that
/// cannot reach its store should not receive traffic.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.retrieval.store_status().await {
        Ok(store) => Ok(Json(ReadinessResponse {
            status: "ready".into(),
            vector_store: store,
        })),
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

pub async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "MCP retrieval gateway",
        "status": "running",
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "mcp": "/sse/",
            "search": "/search",
            "fetch": "/fetch"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::create_router;
    use crate::application::RetrievalService;
    use crate::domain::{
        ports::RetrievalBackend, AssistantAnswer, DomainError, StoredFile,
    };
    use crate::infrastructure::AppConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubBackend {
        store_reachable: bool,
    }

    #[async_trait]
    impl RetrievalBackend for StubBackend {
        async fn ask(&self, _query: &str) -> Result<AssistantAnswer, DomainError> {
            Err(DomainError::backend("not under test"))
        }

        async fn retrieve_file(&self, _id: &str) -> Result<StoredFile, DomainError> {
            Err(DomainError::backend("not under test"))
        }

        async fn store_status(&self) -> Result<StoreStatus, DomainError> {
            if self.store_reachable {
                Ok(StoreStatus {
                    id: "vs_123".into(),
                    name: "docs".into(),
                    total_files: 3,
                })
            } else {
                Err(DomainError::backend("store unreachable"))
            }
        }
    }

    fn test_app(store_reachable: bool) -> Router {
        let config = AppConfig {
            api_key: "sk-secret".into(),
            vector_store_id: "vs_123".into(),
            assistant_id: "asst_456".into(),
            host: "127.0.0.1".into(),
            port: 0,
            base_url: "http://unused".into(),
        };
        let retrieval = Arc::new(RetrievalService::new(Arc::new(StubBackend {
            store_reachable,
        })));
        create_router(crate::api::AppState::new(retrieval, config))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_config_presence_without_secrets() {
        let response = test_app(true).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["config"]["api_key_present"], true);
        assert_eq!(body["config"]["vector_store_id"], "vs_123");
        assert!(!body.to_string().contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_ready_when_store_reachable() {
        let response = test_app(true).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["vector_store"]["total_files"], 3);
    }

    #[tokio::test]
    async fn test_not_ready_when_store_unreachable() {
        let response = test_app(false).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_service_info_lists_endpoints() {
        let response = test_app(true).oneshot(get("/")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["endpoints"]["mcp"], "/sse/");
    }
}
