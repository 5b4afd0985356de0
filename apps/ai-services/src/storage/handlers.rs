use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{check_upload, BlobInfo, StoredBlob, RESUME_PREFIX};

/// Name of the multipart field carrying the resume file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub blob: StoredBlob,
}

/// POST /api/v1/resume/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let content_type = field.content_type().map(String::from);

        // Reject the type before buffering the body.
        check_upload(content_type.as_deref(), 0)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        let content_type = check_upload(content_type.as_deref(), data.len())?;

        let blob = state
            .blob_store
            .upload(data, &filename, &content_type)
            .await?;

        return Ok(Json(UploadResponse {
            success: true,
            message: format!("Resume {filename} uploaded successfully"),
            blob,
        }));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

/// GET /api/v1/resume/list
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<BlobInfo>>, AppError> {
    let blobs = state.blob_store.list(RESUME_PREFIX).await?;
    Ok(Json(blobs))
}

/// DELETE /api/v1/resume/:blob_name
///
/// The blob name contains slashes, so callers percent-encode it.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(blob_name): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.blob_store.delete(&blob_name).await? {
        return Err(AppError::NotFound(format!("Blob {blob_name} not found")));
    }
    Ok(Json(json!({
        "success": true,
        "message": format!("Blob {blob_name} deleted successfully")
    })))
}
