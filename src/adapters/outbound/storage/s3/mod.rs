//! S3-compatible backend construction
//!
//! Builds the `object_store` S3 client scoped to the gallery bucket. The same
//! client backs object I/O and signs the bootstrap bucket requests.

use anyhow::{Context, Result};
use object_store::{
    aws::{AmazonS3, AmazonS3Builder},
    RetryConfig,
};

use crate::domain::value_objects::BucketName;

/// Configuration for an S3-compatible (MinIO, AWS) endpoint
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub port: u16,
    pub use_ssl: bool,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl S3Config {
    /// Endpoint URL assembled from host, port and TLS flag
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.endpoint, self.port)
    }
}

/// Create an S3 store scoped to `bucket`
///
/// Retries are disabled: a failing call surfaces to the request that made it.
pub fn create_s3_store(config: &S3Config, bucket: &BucketName) -> Result<AmazonS3> {
    let retry = RetryConfig {
        max_retries: 0,
        ..Default::default()
    };

    AmazonS3Builder::new()
        .with_endpoint(config.endpoint_url())
        .with_allow_http(!config.use_ssl)
        .with_virtual_hosted_style_request(false)
        .with_bucket_name(bucket.as_str())
        .with_region(&config.region)
        .with_access_key_id(&config.access_key)
        .with_secret_access_key(&config.secret_key)
        .with_retry(retry)
        .build()
        .context("Failed to build S3 store")
}
