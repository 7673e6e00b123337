pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects, models and errors
pub use domain::{
    BucketName, DomainValidationError, GalleryError, ListingEntry, ObjectDownload, ObjectKey,
    ObjectStat, StorageError, UploadRequest,
};

// Port types - interfaces for external systems
pub use ports::{BucketError, BucketOperations, GalleryService, ObjectStore};

// Service implementations - business logic
pub use services::GalleryServiceImpl;

// Application factory and configuration
pub use app::{
    create_in_memory_app, create_minio_app, ensure_bucket, AppBuilder, AppConfig, AppError,
    AppServices, BucketStatus, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{
    ApacheObjectStoreAdapter, InMemoryBucketOperations, S3BucketOperations, S3Config,
};
