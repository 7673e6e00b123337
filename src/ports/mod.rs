pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use services::GalleryService;
pub use storage::{BucketError, BucketOperations, ObjectStore};
