use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{
    ports::RetrievalBackend, AssistantAnswer, Citation, DomainError, StoreStatus, StoredFile,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::openai::types::{
    AssistantObject, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    CreateVectorStoreRequest, ErrorEnvelope, FileObject, FileSearchResources, MessageList,
    MessageObject, RunObject, ThreadObject, ToolResources, ToolSpec, VectorStoreObject,
};

const RUN_POLL_INTERVAL: Duration = Duration::from_millis(500);
const MAX_RUN_POLLS: u32 = 120;

/// Client for the hosted assistant / vector-store API.
///
/// Holds only immutable configuration; safe to share across requests.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    vector_store_id: String,
    assistant_id: String,
}

impl OpenAiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            vector_store_id: config.vector_store_id.clone(),
            assistant_id: config.assistant_id.clone(),
        }
    }

    /// Client bound to credentials only, for provisioning calls made
    /// before a vector store or assistant exists.
    pub fn with_credentials(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            vector_store_id: String::new(),
            assistant_id: String::new(),
        }
    }

    /// Create a vector store with the given name and return its id.
    pub async fn create_vector_store(&self, name: &str) -> Result<String, DomainError> {
        let store: VectorStoreObject = self
            .post_json("/vector_stores", &CreateVectorStoreRequest { name })
            .await?;
        Ok(store.id)
    }

    /// Create a file-search assistant bound to the given vector store and
    /// return its id.
    pub async fn create_assistant(
        &self,
        name: &str,
        model: &str,
        instructions: &str,
        vector_store_id: &str,
    ) -> Result<String, DomainError> {
        let request = CreateAssistantRequest {
            name,
            instructions,
            model,
            tools: vec![ToolSpec {
                kind: "file_search",
            }],
            tool_resources: ToolResources {
                file_search: FileSearchResources {
                    vector_store_ids: vec![vector_store_id.to_string()],
                },
            },
        };
        let assistant: AssistantObject = self.post_json("/assistants", &request).await?;
        Ok(assistant.id)
    }

    async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject, DomainError> {
        for _ in 0..MAX_RUN_POLLS {
            let run: RunObject = self
                .get_json(&format!("/threads/{thread_id}/runs/{run_id}"))
                .await?;
            match run.status.as_str() {
                "queued" | "in_progress" | "cancelling" => {
                    tokio::time::sleep(RUN_POLL_INTERVAL).await;
                }
                _ => return Ok(run),
            }
        }
        Err(DomainError::backend(format!(
            "run {run_id} did not reach a terminal status"
        )))
    }

    async fn filename_for(&self, file_id: &str) -> Option<String> {
        match self.get_json::<FileObject>(&format!("/files/{file_id}")).await {
            Ok(info) => info.filename,
            Err(err) => {
                warn!(file_id, error = %err, "citation filename lookup failed");
                None
            }
        }
    }

    async fn delete_thread(&self, thread_id: &str) {
        let url = self.url(&format!("/threads/{thread_id}"));
        let result = self
            .http
            .delete(&url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(thread_id, status = %response.status(), "failed to delete thread")
            }
            Err(err) => warn!(thread_id, error = %err, "failed to delete thread"),
        }
    }

    async fn get_file_content(&self, file_id: &str) -> Result<String, DomainError> {
        let url = self.url(&format!("/files/{file_id}/content"));
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::backend(format!("failed to read file content: {e}")))?;
        Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| "Binary file content not available".to_string()))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DomainError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("request failed: {e}")))?;
        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("request failed: {e}")))?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, DomainError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    response
        .json()
        .await
        .map_err(|e| DomainError::backend(format!("failed to decode response: {e}")))
}

fn status_error(status: reqwest::StatusCode, body: &str) -> DomainError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    if status == reqwest::StatusCode::NOT_FOUND {
        DomainError::not_found(message)
    } else {
        DomainError::backend(format!("API error ({status}): {message}"))
    }
}

/// Pull the answer text and raw citations out of a message listing.
/// The listing is newest-first; the latest assistant message wins.
fn extract_answer(messages: &MessageList) -> Result<(String, Vec<FileCitationRef>), DomainError> {
    let message: &MessageObject = messages
        .data
        .iter()
        .find(|m| m.role == "assistant")
        .ok_or_else(|| DomainError::backend("no assistant message in thread"))?;

    let text = message
        .content
        .iter()
        .find(|part| part.kind == "text")
        .and_then(|part| part.text.as_ref())
        .ok_or_else(|| DomainError::backend("assistant message contained no text"))?;

    let citations = text
        .annotations
        .iter()
        .filter(|a| a.kind == "file_citation")
        .filter_map(|a| {
            a.file_citation.as_ref().map(|c| FileCitationRef {
                file_id: c.file_id.clone(),
                quote: c.quote.clone(),
            })
        })
        .collect();

    Ok((text.value.clone(), citations))
}

struct FileCitationRef {
    file_id: String,
    quote: Option<String>,
}

#[async_trait]
impl RetrievalBackend for OpenAiClient {
    async fn ask(&self, query: &str) -> Result<AssistantAnswer, DomainError> {
        let thread: ThreadObject = self.post_json("/threads", &serde_json::json!({})).await?;
        debug!(thread_id = %thread.id, "thread created");

        let _: MessageObject = self
            .post_json(
                &format!("/threads/{}/messages", thread.id),
                &CreateMessageRequest {
                    role: "user",
                    content: query,
                },
            )
            .await?;

        let run: RunObject = self
            .post_json(
                &format!("/threads/{}/runs", thread.id),
                &CreateRunRequest {
                    assistant_id: &self.assistant_id,
                    tool_resources: ToolResources {
                        file_search: FileSearchResources {
                            vector_store_ids: vec![self.vector_store_id.clone()],
                        },
                    },
                },
            )
            .await?;

        let run = self.wait_for_run(&thread.id, &run.id).await?;
        if run.status != "completed" {
            let detail = run
                .last_error
                .and_then(|e| e.message)
                .unwrap_or_else(|| run.status.clone());
            return Err(DomainError::backend(format!("run ended with {detail}")));
        }

        let messages: MessageList = self
            .get_json(&format!("/threads/{}/messages", thread.id))
            .await?;
        let (text, refs) = extract_answer(&messages)?;

        // Filename lookups are best effort and deduplicated per file id;
        // a failed lookup degrades the title, never the search.
        let mut filenames: BTreeMap<String, Option<String>> = BTreeMap::new();
        let mut citations = Vec::with_capacity(refs.len());
        for reference in refs {
            if !filenames.contains_key(&reference.file_id) {
                let filename = self.filename_for(&reference.file_id).await;
                filenames.insert(reference.file_id.clone(), filename);
            }
            citations.push(Citation {
                filename: filenames.get(&reference.file_id).cloned().flatten(),
                file_id: reference.file_id,
                excerpt: reference.quote,
            });
        }

        self.delete_thread(&thread.id).await;

        Ok(AssistantAnswer { text, citations })
    }

    async fn retrieve_file(&self, id: &str) -> Result<StoredFile, DomainError> {
        let info: FileObject = self.get_json(&format!("/files/{id}")).await?;
        let content = self.get_file_content(id).await?;

        let mut metadata = BTreeMap::new();
        if let Some(filename) = &info.filename {
            metadata.insert("filename".to_string(), filename.clone());
        }
        if let Some(purpose) = &info.purpose {
            metadata.insert("purpose".to_string(), purpose.clone());
        }
        if let Some(bytes) = info.bytes {
            metadata.insert("bytes".to_string(), bytes.to_string());
        }
        if let Some(created_at) = info.created_at {
            metadata.insert("created_at".to_string(), created_at.to_string());
        }

        Ok(StoredFile {
            id: info.id,
            filename: info.filename.unwrap_or_default(),
            content,
            metadata,
        })
    }

    async fn store_status(&self) -> Result<StoreStatus, DomainError> {
        let store: VectorStoreObject = self
            .get_json(&format!("/vector_stores/{}", self.vector_store_id))
            .await?;
        Ok(StoreStatus {
            id: store.id,
            name: store.name.unwrap_or_default(),
            total_files: store.file_counts.map(|c| c.total).unwrap_or(0),
        })
    }
}
