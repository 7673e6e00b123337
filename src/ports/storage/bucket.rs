use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_objects::BucketName;

/// Errors that can occur in bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    #[error("Bucket already exists: {0}")]
    BucketAlreadyExists(String),

    #[error("Request signing error: {0}")]
    SigningError(String),

    #[error("Service error: {status_code} - {message}")]
    ServiceError { status_code: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Port for the bucket-level calls made while bootstrapping
#[async_trait]
pub trait BucketOperations: Send + Sync + 'static {
    /// Check if a bucket exists
    async fn bucket_exists(&self, bucket: &BucketName) -> Result<bool, BucketError>;

    /// Create a new bucket
    async fn create_bucket(&self, bucket: &BucketName) -> Result<(), BucketError>;
}
