use anyhow::Context;
use facts_gateway::{
    api::build_router,
    chat::ChatState,
    config::Config,
    facts::{FactIngestion, FactsState, SqliteFactStore},
    vector::QdrantIndex,
    workers_ai::WorkersAiClient,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("facts_gateway=info,tower_http=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config_path =
        std::env::var("FACTS_GATEWAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(Some(config_path.as_str())).context("Failed to load configuration")?;

    let store = SqliteFactStore::connect(&config.database)
        .await
        .context("Failed to open fact store")?;
    store.migrate().await.context("Failed to migrate fact store")?;

    let index = QdrantIndex::connect(&config.vector_db)
        .await
        .context("Failed to connect to vector index")?;

    let bind_addr = config.server.bind_addr();
    let server_config = config.server.clone();

    let inference = Arc::new(
        WorkersAiClient::new(config.workers_ai).context("Failed to build inference client")?,
    );

    let facts_state = FactsState {
        ingestion: Arc::new(FactIngestion::new(
            Arc::new(store),
            inference.clone(),
            Arc::new(index),
        )),
    };
    let chat_state = ChatState { model: inference };

    let router = build_router(&server_config, facts_state, chat_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("Server listening on {} (base path {:?})", bind_addr, server_config.base_path);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
