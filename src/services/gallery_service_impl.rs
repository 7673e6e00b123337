use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    domain::{
        errors::{GalleryError, GalleryResult, StorageError},
        models::{ListingEntry, ObjectDownload, UploadRequest, DEFAULT_CONTENT_TYPE},
        value_objects::{BucketName, ObjectKey},
    },
    ports::{services::GalleryService, storage::ObjectStore},
};

/// Implementation of GalleryService on top of a single-bucket object store
#[derive(Clone)]
pub struct GalleryServiceImpl {
    store: Arc<dyn ObjectStore>,
    bucket: BucketName,
}

impl GalleryServiceImpl {
    /// Create a new GalleryServiceImpl instance
    pub fn new(store: Arc<dyn ObjectStore>, bucket: BucketName) -> Self {
        Self { store, bucket }
    }

    /// Parse a client supplied name for a read path, where a bad name is
    /// indistinguishable from a missing object
    fn lookup_key(object_name: &str) -> Result<ObjectKey, StorageError> {
        ObjectKey::new(object_name.to_string()).map_err(|e| StorageError::ValidationError {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl GalleryService for GalleryServiceImpl {
    fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    async fn list_objects(&self) -> GalleryResult<Vec<ListingEntry>> {
        let mut stream = self.store.list_objects();
        let mut entries = Vec::new();

        while let Some(entry) = stream.try_next().await.map_err(|e| {
            debug!(bucket = %self.bucket, error = %e, "listing failed");
            GalleryError::Storage(e)
        })? {
            if entry.is_listable() {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    async fn upload_object(&self, upload: UploadRequest) -> GalleryResult<ObjectKey> {
        // A name the store cannot hold fails like any other write
        let key = ObjectKey::for_upload(Utc::now().timestamp_millis(), &upload.file_name)
            .map_err(|e| {
                error!(file_name = %upload.file_name, error = %e, "upload failed");
                GalleryError::Storage(StorageError::ValidationError {
                    message: e.to_string(),
                })
            })?;
        let content_type = upload
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let size = upload.data.len();

        self.store
            .put_object(&key, upload.data, Some(content_type))
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "upload failed");
                GalleryError::Storage(e)
            })?;

        info!(key = %key, size, content_type, "object uploaded");
        Ok(key)
    }

    async fn delete_object(&self, object_name: &str) -> GalleryResult<()> {
        if object_name.is_empty() {
            return Err(GalleryError::MissingObjectName);
        }

        let key = ObjectKey::new(object_name.to_string())?;

        self.store.remove_object(&key).await.map_err(|e| {
            debug!(key = %key, error = %e, "delete failed");
            GalleryError::Storage(e)
        })?;

        info!(key = %key, "object deleted");
        Ok(())
    }

    async fn download_object(&self, object_name: &str) -> GalleryResult<ObjectDownload> {
        let open = async {
            let key = Self::lookup_key(object_name)?;
            let stat = self.store.stat_object(&key).await?;
            let body = self.store.get_object(&key).await?;
            Ok::<_, StorageError>(ObjectDownload { stat, body })
        };

        open.await.map_err(|e| {
            error!(object = object_name, error = %e, "download failed");
            GalleryError::Storage(e)
        })
    }

    async fn preview_object(&self, object_name: &str) -> GalleryResult<ObjectDownload> {
        let key = Self::lookup_key(object_name).map_err(|_| GalleryError::ImageNotFound)?;

        let stat = self.store.stat_object(&key).await.map_err(|e| {
            debug!(key = %key, error = %e, "preview stat failed");
            GalleryError::ImageNotFound
        })?;

        if !stat.is_image() {
            return Err(GalleryError::NotAnImage {
                content_type: stat.content_type().to_string(),
            });
        }

        let body = self.store.get_object(&key).await?;
        Ok(ObjectDownload { stat, body })
    }
}
