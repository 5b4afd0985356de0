use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelGateway;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every model call goes through this gateway; it owns the concurrency limiter.
    pub llm: ModelGateway,
    pub blob_store: Arc<dyn BlobStore>,
    pub config: Config,
}
