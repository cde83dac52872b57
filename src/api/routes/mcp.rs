//! MCP-over-HTTP endpoint: a JSON-RPC dispatcher exposing the `search`
//! and `fetch` tools to MCP clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::api::state::AppState;
use crate::domain::DomainError;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub async fn handle_rpc(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let request: RpcRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(_) => return rpc_error(Value::Null, INVALID_REQUEST, "invalid request").into_response(),
    };

    // No id means a notification; acknowledged without a response body.
    let Some(id) = request.id else {
        return StatusCode::ACCEPTED.into_response();
    };

    match request.method.as_str() {
        "initialize" => rpc_result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
        .into_response(),
        "ping" => rpc_result(id, json!({})).into_response(),
        "tools/list" => rpc_result(id, json!({ "tools": tool_descriptors() })).into_response(),
        "tools/call" => handle_tool_call(&state, id, request.params)
            .await
            .into_response(),
        _ => rpc_error(id, METHOD_NOT_FOUND, "method not found").into_response(),
    }
}

async fn handle_tool_call(state: &AppState, id: Value, params: Option<Value>) -> Json<Value> {
    let params: Option<ToolCallParams> =
        params.and_then(|value| serde_json::from_value(value).ok());
    let Some(params) = params else {
        return rpc_error(id, INVALID_PARAMS, "invalid tool call params");
    };

    let outcome = match params.name.as_str() {
        "search" => {
            let query = params
                .arguments
                .get("query")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match state.retrieval.search(query).await {
                Ok(results) => serialize_payload(&json!({ "results": results })),
                Err(err) => Err(err),
            }
        }
        "fetch" => {
            let doc_id = params
                .arguments
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match state.retrieval.fetch(doc_id).await {
                Ok(document) => serialize_payload(&document),
                Err(err) => Err(err),
            }
        }
        other => {
            return rpc_error(id, INVALID_PARAMS, &format!("unknown tool: {other}"));
        }
    };

    match outcome {
        Ok(payload) => rpc_result(
            id,
            json!({
                "content": [{"type": "text", "text": payload}],
                "isError": false
            }),
        ),
        Err(err) => rpc_result(
            id,
            json!({
                "content": [{"type": "text", "text": tool_error_message(&err)}],
                "isError": true
            }),
        ),
    }
}

fn serialize_payload<T: serde::Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string(value).map_err(|e| DomainError::backend(e.to_string()))
}

/// Caller mistakes keep their message; backend detail is logged and
/// replaced with a generic message.
fn tool_error_message(err: &DomainError) -> String {
    match err {
        DomainError::InvalidInput(msg) | DomainError::NotFound(msg) => msg.clone(),
        DomainError::Backend(_) => {
            error!(error = %err, "tool call failed");
            "The search backend is unavailable".to_string()
        }
        DomainError::Config(_) => "The service is misconfigured".to_string(),
    }
}

fn tool_descriptors() -> Value {
    json!([
        {
            "name": "search",
            "description": "Search for relevant documents in the vector store",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query string"
                    }
                },
                "required": ["query"]
            }
        },
        {
            "name": "fetch",
            "description": "Fetch the full content of a document by its ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "The unique identifier for the document"
                    }
                },
                "required": ["id"]
            }
        }
    ])
}

fn rpc_result(id: Value, result: Value) -> Json<Value> {
    Json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

fn rpc_error(id: Value, code: i64, message: &str) -> Json<Value> {
    Json(json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}}))
}
