use bytes::Bytes;
use futures::stream::BoxStream;
use serde::Serialize;

use crate::domain::{errors::StorageResult, value_objects::ObjectKey};

/// Content type assumed when an object carries none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One row of the bucket listing, built per request and never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub key: String,
    pub size: u64,
}

impl ListingEntry {
    /// Entries without a name or with a zero size are left out of the listing
    pub fn is_listable(&self) -> bool {
        !self.key.is_empty() && self.size > 0
    }
}

/// Metadata returned by a stat of a single object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStat {
    pub key: ObjectKey,
    pub size: u64,
    pub content_type: Option<String>,
}

impl ObjectStat {
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Streamed object payload, released when dropped
pub type ObjectBody = BoxStream<'static, StorageResult<Bytes>>;

/// An object ready to be streamed back to a client
pub struct ObjectDownload {
    pub stat: ObjectStat,
    pub body: ObjectBody,
}

impl std::fmt::Debug for ObjectDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDownload")
            .field("stat", &self.stat)
            .finish_non_exhaustive()
    }
}

/// A file received from the upload form
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}
