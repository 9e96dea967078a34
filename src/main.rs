use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use professor_rag::api::{create_router, AppState};
use professor_rag::application::{ChatService, RetrievalService};
use professor_rag::domain::ports::{EmbeddingService, VectorIndex};
use professor_rag::infrastructure::{
    AppConfig, InMemoryVectorIndex, OpenAiChatModel, OpenAiEmbedding, QdrantVectorIndex,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,professor_rag=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    let mut openai_config = OpenAIConfig::new();
    if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
        openai_config = openai_config.with_api_key(api_key);
    }
    if let Ok(api_base) = std::env::var("OPENAI_API_BASE") {
        openai_config = openai_config.with_api_base(api_base);
    }
    let openai_client = Client::with_config(openai_config);

    let embedding = Arc::new(OpenAiEmbedding::new(
        openai_client.clone(),
        &config.embedding,
    ));
    let chat_model = Arc::new(OpenAiChatModel::new(openai_client, &config.chat));

    let index: Arc<dyn VectorIndex> = match &config.index.qdrant_url {
        Some(url) => {
            let index =
                QdrantVectorIndex::new(url, &config.index.collection, embedding.dimension())
                    .await
                    .map_err(|e| anyhow::anyhow!("failed to connect to Qdrant: {e}"))?;
            info!(url = %url, collection = %config.index.collection, "Qdrant index initialized");
            Arc::new(index)
        }
        None => {
            warn!("QDRANT_URL not set, using in-memory index");
            Arc::new(InMemoryVectorIndex::new())
        }
    };

    let retrieval = Arc::new(
        RetrievalService::new(embedding, index.clone(), config.index.top_k).with_timeouts(
            Duration::from_secs(config.embedding.timeout_seconds),
            Duration::from_secs(config.index.timeout_seconds),
        ),
    );
    let chat = Arc::new(
        ChatService::new(retrieval.clone(), chat_model)
            .with_generation_timeout(Duration::from_secs(config.chat.timeout_seconds)),
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let state = AppState::new(chat, retrieval, index, config);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
