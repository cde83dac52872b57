use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vectorstore_mcp::api::{create_router, AppState};
use vectorstore_mcp::application::RetrievalService;
use vectorstore_mcp::infrastructure::{AppConfig, OpenAiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vectorstore_mcp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let backend = Arc::new(OpenAiClient::new(&config));
    let retrieval = Arc::new(RetrievalService::new(backend));
    info!(
        vector_store_id = %config.vector_store_id,
        assistant_id = %config.assistant_id,
        "retrieval backend initialized"
    );

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let state = AppState::new(retrieval, config);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
