use crate::domain::{
    errors::StorageResult,
    models::{ListingEntry, ObjectBody, ObjectStat},
    value_objects::ObjectKey,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Port for object storage operations against the gallery bucket
/// This abstracts the actual storage backend (S3, MinIO, in-memory)
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Lazily list every object in the bucket, recursively and without prefix
    ///
    /// The stream is one-shot; every call issues a fresh listing.
    fn list_objects(&self) -> BoxStream<'_, StorageResult<ListingEntry>>;

    /// Store object data under `key` with its content type
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()>;

    /// Fetch size and content type without the payload
    async fn stat_object(&self, key: &ObjectKey) -> StorageResult<ObjectStat>;

    /// Open the payload as a stream of chunks
    async fn get_object(&self, key: &ObjectKey) -> StorageResult<ObjectBody>;

    /// Remove an object; removing a missing key succeeds
    async fn remove_object(&self, key: &ObjectKey) -> StorageResult<()>;
}
