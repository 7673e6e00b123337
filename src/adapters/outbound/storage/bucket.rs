use async_trait::async_trait;
use http::Method;
use object_store::{path::Path as ObjectPath, signer::Signer};
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use std::{collections::HashSet, sync::Arc, time::Duration};
use tokio::sync::RwLock;

use crate::{
    domain::value_objects::BucketName,
    ports::storage::{BucketError, BucketOperations},
};

const SIGNATURE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_REGION: &str = "us-east-1";

/// Error body returned by S3-compatible services
#[derive(Debug, Deserialize)]
struct S3ErrorResponse {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Bucket calls issued as presigned requests
///
/// `object_store` has no bucket-level API, but its S3 signer can sign any
/// path of the configured bucket. Signing the empty path yields the bucket
/// URL itself, which is what HEAD/PUT bucket need.
pub struct S3BucketOperations<S: Signer> {
    signer: Arc<S>,
    region: String,
    http_client: Client,
}

impl<S: Signer> S3BucketOperations<S> {
    pub fn new(signer: Arc<S>, region: impl Into<String>) -> Self {
        Self {
            signer,
            region: region.into(),
            http_client: Client::new(),
        }
    }

    async fn bucket_url(&self, method: Method) -> Result<String, BucketError> {
        let url = self
            .signer
            .signed_url(method, &ObjectPath::from(""), SIGNATURE_TTL)
            .await
            .map_err(|e| BucketError::SigningError(e.to_string()))?;
        Ok(url.to_string())
    }

    fn create_bucket_body(&self) -> String {
        if self.region == DEFAULT_REGION {
            String::new()
        } else {
            format!(
                "<CreateBucketConfiguration><LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
                self.region
            )
        }
    }
}

#[async_trait]
impl<S: Signer> BucketOperations for S3BucketOperations<S> {
    async fn bucket_exists(&self, _bucket: &BucketName) -> Result<bool, BucketError> {
        let url = self.bucket_url(Method::HEAD).await?;

        let response = self
            .http_client
            .head(url)
            .send()
            .await
            .map_err(|e| BucketError::Transport(e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => Ok(true),
            404 => Ok(false),
            status_code => Err(BucketError::ServiceError {
                status_code,
                message: "Failed to check bucket".to_string(),
            }),
        }
    }

    async fn create_bucket(&self, bucket: &BucketName) -> Result<(), BucketError> {
        let url = self.bucket_url(Method::PUT).await?;

        let response = self
            .http_client
            .put(url)
            .body(self.create_bucket_body())
            .send()
            .await
            .map_err(|e| BucketError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|e| BucketError::Transport(e.to_string()))?;
        classify_create_failure(bucket, status.as_u16(), &body)
    }
}

/// Turn a failed CreateBucket response into the outcome the caller sees
fn classify_create_failure(
    bucket: &BucketName,
    status_code: u16,
    body: &str,
) -> Result<(), BucketError> {
    match from_str::<S3ErrorResponse>(body) {
        // Another instance of ours won the race
        Ok(err) if err.code == "BucketAlreadyOwnedByYou" => Ok(()),
        Ok(err) if err.code == "BucketAlreadyExists" => {
            Err(BucketError::BucketAlreadyExists(bucket.to_string()))
        }
        Ok(err) => Err(BucketError::ServiceError {
            status_code,
            message: format!("{}: {}", err.code, err.message),
        }),
        Err(_) => Err(BucketError::ServiceError {
            status_code,
            message: "Failed to create bucket".to_string(),
        }),
    }
}

/// In-memory bucket registry for testing and development
#[derive(Clone, Default)]
pub struct InMemoryBucketOperations {
    buckets: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryBucketOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a bucket that already exists
    pub fn with_bucket(bucket: &BucketName) -> Self {
        let mut buckets = HashSet::new();
        buckets.insert(bucket.to_string());
        Self {
            buckets: Arc::new(RwLock::new(buckets)),
        }
    }
}

#[async_trait]
impl BucketOperations for InMemoryBucketOperations {
    async fn bucket_exists(&self, bucket: &BucketName) -> Result<bool, BucketError> {
        Ok(self.buckets.read().await.contains(bucket.as_str()))
    }

    async fn create_bucket(&self, bucket: &BucketName) -> Result<(), BucketError> {
        if !self.buckets.write().await.insert(bucket.to_string()) {
            return Err(BucketError::BucketAlreadyExists(bucket.to_string()));
        }
        Ok(())
    }
}
