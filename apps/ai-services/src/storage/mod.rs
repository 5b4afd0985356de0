//! Resume file storage. The evaluation pipeline never touches it; it only backs
//! the upload / list / delete endpoints and the health probe.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;

pub mod handlers;
pub mod s3;

/// Every uploaded resume lives under this prefix.
pub const RESUME_PREFIX: &str = "resumes/";

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT: &str = "text/plain";
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = [PDF, DOCX, PLAIN_TEXT];

#[derive(Debug, Error)]
#[error("storage {operation} failed: {message}")]
pub struct StorageError {
    pub operation: &'static str,
    pub message: String,
}

impl StorageError {
    pub fn new(operation: &'static str, message: impl std::fmt::Display) -> Self {
        Self {
            operation,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredBlob {
    pub blob_name: String,
    pub blob_url: String,
    pub original_filename: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_at: String,
    /// Time-limited read link, when the backend can sign one.
    pub presigned_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlobInfo {
    pub blob_name: String,
    pub original_filename: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageHealth {
    pub status: String,
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StorageHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        data: Bytes,
        original_filename: &str,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError>;

    async fn list(&self, prefix: &str) -> Result<Vec<BlobInfo>, StorageError>;

    /// `Ok(false)` when no such blob exists.
    async fn delete(&self, blob_name: &str) -> Result<bool, StorageError>;

    async fn health_check(&self) -> StorageHealth;
}

/// Media type without parameters, lowercased (`text/plain; charset=utf-8` → `text/plain`).
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Rejects unsupported types and oversized payloads before anything is stored.
/// Returns the normalised content type.
pub fn check_upload(content_type: Option<&str>, size: usize) -> Result<String, AppError> {
    let normalised = content_type.map(essence).unwrap_or_default();
    if !ALLOWED_CONTENT_TYPES.contains(&normalised.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file type. Allowed types: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is 10MB. Current size: {size} bytes"
        )));
    }
    Ok(normalised)
}

/// `resumes/YYYY/MM/DD/<id><.ext>` with the extension lowercased.
pub fn blob_name_for(original_filename: &str, now: DateTime<Utc>, id: Uuid) -> String {
    let extension = Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{RESUME_PREFIX}{}/{id}{extension}", now.format("%Y/%m/%d"))
}

/// Last path segment of a blob name.
pub fn display_name(blob_name: &str) -> &str {
    blob_name.rsplit('/').next().unwrap_or(blob_name)
}

pub fn content_type_for(blob_name: &str) -> Option<&'static str> {
    let extension = Path::new(blob_name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(PDF),
        "docx" => Some(DOCX),
        "txt" => Some(PLAIN_TEXT),
        _ => None,
    }
}
