//! Direct JSON endpoints for the two tools, kept alongside the MCP
//! surface for curl-level testing of a deployment.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::domain::{Document, DomainError, SearchResult};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub id: String,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<Value>)> {
    let results = state
        .retrieval
        .search(&request.query)
        .await
        .map_err(error_response)?;
    Ok(Json(SearchResponse { results }))
}

pub async fn fetch_handler(
    State(state): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<Document>, (StatusCode, Json<Value>)> {
    let document = state
        .retrieval
        .fetch(&request.id)
        .await
        .map_err(error_response)?;
    Ok(Json(document))
}

/// Caller mistakes keep their message; backend detail is logged and
/// replaced with a generic message.
fn error_response(err: DomainError) -> (StatusCode, Json<Value>) {
    let (status, message) = match &err {
        DomainError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        DomainError::Backend(_) => {
            tracing::error!(error = %err, "backend failure");
            (
                StatusCode::BAD_GATEWAY,
                "The search backend is unavailable".to_string(),
            )
        }
        DomainError::Config(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "The service is misconfigured".to_string(),
        ),
    };
    (status, Json(json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::create_router;
    use crate::api::AppState;
    use crate::application::RetrievalService;
    use crate::domain::{
        ports::RetrievalBackend, AssistantAnswer, Citation, StoreStatus, StoredFile,
    };
    use crate::infrastructure::AppConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubBackend;

    #[async_trait]
    impl RetrievalBackend for StubBackend {
        async fn ask(&self, _query: &str) -> Result<AssistantAnswer, DomainError> {
            Ok(AssistantAnswer {
                text: "answer".into(),
                citations: vec![Citation {
                    file_id: "file-1".into(),
                    filename: Some("doc.pdf".into()),
                    excerpt: Some("excerpt".into()),
                }],
            })
        }

        async fn retrieve_file(&self, id: &str) -> Result<StoredFile, DomainError> {
            if id != "file-1" {
                return Err(DomainError::not_found(format!("no file {id}")));
            }
            Ok(StoredFile {
                id: "file-1".into(),
                filename: "doc.pdf".into(),
                content: "full text".into(),
                metadata: BTreeMap::new(),
            })
        }

        async fn store_status(&self) -> Result<StoreStatus, DomainError> {
            Err(DomainError::backend("not under test"))
        }
    }

    fn test_app() -> Router {
        let config = AppConfig {
            api_key: "sk-test".into(),
            vector_store_id: "vs_123".into(),
            assistant_id: "asst_456".into(),
            host: "127.0.0.1".into(),
            port: 0,
            base_url: "http://unused".into(),
        };
        let retrieval = Arc::new(RetrievalService::new(Arc::new(StubBackend)));
        create_router(AppState::new(retrieval, config))
    }

    fn post(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_results() {
        let response = test_app()
            .oneshot(post("/search", json!({"query": "cats"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["results"][0]["id"], "file-1");
    }

    #[tokio::test]
    async fn test_search_empty_query_is_bad_request() {
        let response = test_app()
            .oneshot(post("/search", json!({"query": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id_is_not_found() {
        let response = test_app()
            .oneshot(post("/fetch", json!({"id": "file-gone"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_returns_document() {
        let response = test_app()
            .oneshot(post("/fetch", json!({"id": "file-1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["id"], "file-1");
        assert_eq!(body["title"], "doc.pdf");
        assert_eq!(body["text"], "full text");
    }
}
