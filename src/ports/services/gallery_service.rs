use crate::domain::{
    errors::GalleryResult,
    models::{ListingEntry, ObjectDownload, UploadRequest},
    value_objects::{BucketName, ObjectKey},
};
use async_trait::async_trait;

/// Port for the gallery operations behind the web front end
#[async_trait]
pub trait GalleryService: Send + Sync + 'static {
    /// The single bucket this gallery serves
    fn bucket(&self) -> &BucketName;

    /// List every non-empty object in the bucket, in store order
    async fn list_objects(&self) -> GalleryResult<Vec<ListingEntry>>;

    /// Store an uploaded file under a fresh timestamped key
    async fn upload_object(&self, upload: UploadRequest) -> GalleryResult<ObjectKey>;

    /// Delete an object by name
    async fn delete_object(&self, object_name: &str) -> GalleryResult<()>;

    /// Open an object for download as an attachment
    async fn download_object(&self, object_name: &str) -> GalleryResult<ObjectDownload>;

    /// Open an image object for inline display
    async fn preview_object(&self, object_name: &str) -> GalleryResult<ObjectDownload>;
}
