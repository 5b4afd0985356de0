use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Probes the model deployment and the blob store concurrently.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let (model, storage) = tokio::join!(
        state.llm.connectivity_check(),
        state.blob_store.health_check()
    );

    let status = if model.ok && storage.is_healthy() {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "services": {
            "azure_openai": model,
            "storage": storage,
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "deployment": state.config.azure_openai_deployment_name,
        "endpoints": {
            "health": "/health",
            "rank": "/api/v1/resume/rank",
            "screen": "/api/v1/resume/screen",
            "upload": "/api/v1/resume/upload",
            "list": "/api/v1/resume/list",
            "delete": "/api/v1/resume/{blob_name}",
            "job_templates": "/api/v1/job-templates"
        }
    }))
}
