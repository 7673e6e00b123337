use axum::Router;
use object_store::memory::InMemory;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    adapters::{
        inbound::http::{
            router::{create_router, AppState},
            views::Views,
        },
        outbound::storage::{
            create_s3_store, ApacheObjectStoreAdapter, InMemoryBucketOperations,
            S3BucketOperations, S3Config,
        },
    },
    domain::value_objects::BucketName,
    ports::storage::{BucketError, BucketOperations, ObjectStore},
    services::GalleryServiceImpl,
};

/// Default request body limit for uploads (64 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bucket: BucketName,
    pub storage_backend: StorageBackend,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// In-memory configuration for the given bucket
    pub fn new(bucket: BucketName) -> Self {
        Self {
            bucket,
            storage_backend: StorageBackend::InMemory,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3(S3Config),
}

/// Application dependencies container
pub struct AppDependencies {
    pub object_store: Arc<dyn ObjectStore>,
    pub bucket_operations: Arc<dyn BucketOperations>,
}

/// Application services container
pub struct AppServices {
    pub gallery_service: Arc<GalleryServiceImpl>,
    pub bucket_operations: Arc<dyn BucketOperations>,
    pub bucket: BucketName,
    pub max_upload_bytes: usize,
}

impl AppServices {
    /// Make sure the configured bucket exists
    pub async fn bootstrap(&self) -> Result<BucketStatus, AppError> {
        ensure_bucket(self.bucket_operations.as_ref(), &self.bucket).await
    }

    /// Router serving the gallery over these services
    pub fn router(&self) -> Result<Router, AppError> {
        let state = AppState {
            gallery: self.gallery_service.clone(),
            views: Arc::new(Views::new()?),
        };

        Ok(create_router(state, self.max_upload_bytes))
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder for `bucket`, backed by memory
    pub fn new(bucket: BucketName) -> Self {
        Self {
            config: AppConfig::new(bucket),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure the upload body limit
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.config.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Build the application dependencies
    pub fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => Ok(AppDependencies {
                object_store: Arc::new(ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()))),
                bucket_operations: Arc::new(InMemoryBucketOperations::new()),
            }),
            StorageBackend::S3(s3) => {
                let store = Arc::new(create_s3_store(s3, &self.config.bucket).map_err(|e| {
                    AppError::StorageInit {
                        message: format!("{:#}", e),
                    }
                })?);

                Ok(AppDependencies {
                    object_store: Arc::new(ApacheObjectStoreAdapter::new(store.clone())),
                    bucket_operations: Arc::new(S3BucketOperations::new(store, s3.region.clone())),
                })
            }
        }
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies()?;

        let gallery_service = Arc::new(GalleryServiceImpl::new(
            deps.object_store,
            self.config.bucket.clone(),
        ));

        Ok(AppServices {
            gallery_service,
            bucket_operations: deps.bucket_operations,
            bucket: self.config.bucket,
            max_upload_bytes: self.config.max_upload_bytes,
        })
    }
}

/// Outcome of bucket bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    Existing,
    Created,
}

/// Create `bucket` unless it already exists
pub async fn ensure_bucket(
    operations: &dyn BucketOperations,
    bucket: &BucketName,
) -> Result<BucketStatus, AppError> {
    if operations.bucket_exists(bucket).await? {
        debug!(%bucket, "bucket already exists");
        return Ok(BucketStatus::Existing);
    }

    operations.create_bucket(bucket).await?;
    info!(%bucket, "created bucket");

    Ok(BucketStatus::Created)
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Bucket bootstrap failed: {0}")]
    Bootstrap(#[from] BucketError),

    #[error("Template registration failed: {0}")]
    Templates(#[from] tera::Error),
}

/// Create an in-memory application for testing and development
///
/// The bucket is bootstrapped before returning.
pub async fn create_in_memory_app(bucket: BucketName) -> Result<AppServices, AppError> {
    let services = AppBuilder::new(bucket)
        .with_storage_backend(StorageBackend::InMemory)
        .build()?;
    services.bootstrap().await?;
    Ok(services)
}

/// Create an application backed by a MinIO (or other S3-compatible) endpoint
///
/// Nothing is sent over the network until [`AppServices::bootstrap`] runs.
pub fn create_minio_app(bucket: BucketName, config: S3Config) -> Result<AppServices, AppError> {
    AppBuilder::new(bucket)
        .with_storage_backend(StorageBackend::S3(config))
        .build()
}
