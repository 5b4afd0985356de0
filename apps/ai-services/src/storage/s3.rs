use std::time::Duration;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTimeFormat};
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::storage::{
    blob_name_for, content_type_for, display_name, BlobInfo, BlobStore, StorageError,
    StorageHealth, StoredBlob,
};

/// How long a presigned read link stays valid.
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// S3-compatible resume store. Works against AWS or a MinIO endpoint.
#[derive(Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    object_url_base: String,
}

impl S3BlobStore {
    pub async fn connect(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()));

        if let (Some(key_id), Some(secret)) =
            (&config.aws_access_key_id, &config.aws_secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "ai-services-static",
            ));
        }
        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        // MinIO and other self-hosted endpoints need path-style addressing.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        let object_url_base = match &config.s3_endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), config.s3_bucket),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                config.s3_bucket, config.s3_region
            ),
        };

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.s3_bucket.clone(),
            object_url_base,
        }
    }

    async fn presign(&self, blob_name: &str) -> Option<String> {
        let presigning = PresigningConfig::expires_in(PRESIGNED_URL_TTL).ok()?;
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .presigned(presigning)
            .await
        {
            Ok(request) => Some(request.uri().to_string()),
            Err(e) => {
                warn!("Could not presign {blob_name}: {}", DisplayErrorContext(&e));
                None
            }
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        data: Bytes,
        original_filename: &str,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        let now = Utc::now();
        let blob_name = blob_name_for(original_filename, now, Uuid::new_v4());
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&blob_name)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .metadata("original_filename", original_filename)
            .metadata("uploaded_at", now.to_rfc3339())
            .send()
            .await
            .map_err(|e| StorageError::new("upload", DisplayErrorContext(&e)))?;

        info!(
            "Uploaded {original_filename} to s3://{}/{blob_name} ({size} bytes)",
            self.bucket
        );

        Ok(StoredBlob {
            blob_url: format!("{}/{blob_name}", self.object_url_base),
            presigned_url: self.presign(&blob_name).await,
            blob_name,
            original_filename: original_filename.to_string(),
            content_type: content_type.to_string(),
            size,
            uploaded_at: now.to_rfc3339(),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobInfo>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut blobs = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| StorageError::new("list", DisplayErrorContext(&e)))?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                blobs.push(BlobInfo {
                    blob_name: key.to_string(),
                    original_filename: display_name(key).to_string(),
                    content_type: content_type_for(key).map(String::from),
                    size: object.size().unwrap_or_default().max(0) as u64,
                    uploaded_at: object
                        .last_modified()
                        .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok())
                        .unwrap_or_default(),
                });
            }
        }
        Ok(blobs)
    }

    async fn delete(&self, blob_name: &str) -> Result<bool, StorageError> {
        if let Err(e) = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .send()
            .await
        {
            let service_error = e.into_service_error();
            if service_error.is_not_found() {
                return Ok(false);
            }
            return Err(StorageError::new(
                "delete",
                DisplayErrorContext(&service_error),
            ));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(blob_name)
            .send()
            .await
            .map_err(|e| StorageError::new("delete", DisplayErrorContext(&e)))?;

        info!("Deleted s3://{}/{blob_name}", self.bucket);
        Ok(true)
    }

    async fn health_check(&self) -> StorageHealth {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => StorageHealth {
                status: "healthy".to_string(),
                bucket: self.bucket.clone(),
                message: None,
            },
            Err(e) => StorageHealth {
                status: "unhealthy".to_string(),
                bucket: self.bucket.clone(),
                message: Some(DisplayErrorContext(&e).to_string()),
            },
        }
    }
}
