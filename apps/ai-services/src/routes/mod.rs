pub mod health;
pub mod templates;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::state::AppState;
use crate::storage::{handlers as storage, MAX_UPLOAD_BYTES};

/// Headroom over the file limit for multipart framing, so oversized files reach
/// the explicit size check instead of axum's generic 413.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/job-templates", get(templates::templates_handler))
        // Evaluation
        .route("/api/v1/resume/rank", post(evaluation::handle_rank))
        .route("/api/v1/resume/screen", post(evaluation::handle_screen))
        // Storage
        .route(
            "/api/v1/resume/upload",
            post(storage::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/resume/list", get(storage::handle_list))
        .route("/api/v1/resume/:blob_name", delete(storage::handle_delete))
        .with_state(state)
}
