//! One-shot provisioning tool: creates a vector store and a file-search
//! assistant bound to it, then prints the env values the api binary needs.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vectorstore_mcp::infrastructure::OpenAiClient;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_STORE_NAME: &str = "MCP Server Document Store";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const ASSISTANT_NAME: &str = "Vector Store Search Assistant";
const ASSISTANT_INSTRUCTIONS: &str = "You are a helpful assistant that searches through documents \
in a vector store to answer questions. Search the available documents and answer from the \
content found.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vectorstore_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable is required"))?;
    let base_url =
        std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let store_name =
        std::env::var("VECTOR_STORE_NAME").unwrap_or_else(|_| DEFAULT_STORE_NAME.to_string());
    let model = std::env::var("ASSISTANT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let client = OpenAiClient::with_credentials(base_url, api_key);

    info!(name = %store_name, "creating vector store");
    let store_id = client.create_vector_store(&store_name).await?;
    info!(%store_id, "vector store created");

    info!(%model, "creating assistant");
    let assistant_id = client
        .create_assistant(ASSISTANT_NAME, &model, ASSISTANT_INSTRUCTIONS, &store_id)
        .await?;
    info!(%assistant_id, "assistant created");

    println!("Add these to your .env file:");
    println!("VECTOR_STORE_ID={store_id}");
    println!("ASSISTANT_ID={assistant_id}");
    println!();
    println!("Upload documents to the vector store, then start the api binary.");

    Ok(())
}
