mod config;
mod errors;
mod evaluation;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tokio::sync::Semaphore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::azure::AzureOpenAiClient;
use crate::llm_client::{ModelGateway, RetryPolicy};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::s3::S3BlobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing Azure OpenAI credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting {} v{} (deployment: {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.azure_openai_deployment_name
    );

    // One limiter for the whole process: every model call takes a slot.
    let limiter = Arc::new(Semaphore::new(config.ai.max_concurrency));
    let backend = Arc::new(AzureOpenAiClient::new(&config)?);
    let llm = ModelGateway::new(backend, limiter, RetryPolicy::from(&config.ai));
    info!(
        "Model gateway initialized (concurrency {}, retries {}, timeout {:?})",
        config.ai.max_concurrency, config.ai.max_retries, config.ai.request_timeout
    );

    // Initialize S3 / MinIO
    let blob_store = Arc::new(S3BlobStore::connect(&config).await);
    info!("Blob store initialized (bucket: {})", config.s3_bucket);

    let state = AppState {
        llm,
        blob_store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
