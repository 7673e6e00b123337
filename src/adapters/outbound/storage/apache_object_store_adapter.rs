use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use object_store::{
    path::Path as ObjectPath, Attribute, Attributes, GetOptions, ObjectStore as ApacheObjectStore,
    PutOptions, PutPayload,
};
use std::sync::Arc;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{ListingEntry, ObjectBody, ObjectStat},
        value_objects::ObjectKey,
    },
    ports::storage::ObjectStore,
};

/// Adapter that implements our ObjectStore trait using Apache object_store
///
/// The wrapped store is already scoped to the gallery bucket, so keys map
/// straight onto object paths.
#[derive(Clone)]
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
}

impl ApacheObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self { inner: store }
    }

    /// Keys read back from a listing are already in path form; anything else
    /// is encoded segment by segment.
    fn to_object_path(key: &ObjectKey) -> ObjectPath {
        ObjectPath::parse(key.as_str()).unwrap_or_else(|_| ObjectPath::from(key.as_str()))
    }

    fn map_error(key: &ObjectKey, operation: &str, err: object_store::Error) -> StorageError {
        match err {
            object_store::Error::NotFound { .. } => {
                StorageError::ObjectNotFound { key: key.clone() }
            }
            e => StorageError::infrastructure(format!("Failed to {} object", operation), e),
        }
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    fn list_objects(&self) -> BoxStream<'_, StorageResult<ListingEntry>> {
        self.inner
            .list(None)
            .map_ok(|meta| ListingEntry {
                key: meta.location.to_string(),
                size: meta.size,
            })
            .map_err(|e| StorageError::infrastructure("Failed to list objects", e))
            .boxed()
    }

    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        let path = Self::to_object_path(key);
        let payload = PutPayload::from(data);

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.inner
            .put_opts(&path, payload, options)
            .await
            .map_err(|e| Self::map_error(key, "put", e))?;

        Ok(())
    }

    async fn stat_object(&self, key: &ObjectKey) -> StorageResult<ObjectStat> {
        let path = Self::to_object_path(key);
        let options = GetOptions {
            head: true,
            ..Default::default()
        };

        let result = self
            .inner
            .get_opts(&path, options)
            .await
            .map_err(|e| Self::map_error(key, "stat", e))?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());

        Ok(ObjectStat {
            key: key.clone(),
            size: result.meta.size,
            content_type,
        })
    }

    async fn get_object(&self, key: &ObjectKey) -> StorageResult<ObjectBody> {
        let path = Self::to_object_path(key);

        let result = self
            .inner
            .get(&path)
            .await
            .map_err(|e| Self::map_error(key, "get", e))?;

        let key = key.clone();
        let body = result
            .into_stream()
            .map_err(move |e| Self::map_error(&key, "read", e))
            .boxed();

        Ok(body)
    }

    async fn remove_object(&self, key: &ObjectKey) -> StorageResult<()> {
        let path = Self::to_object_path(key);

        match self.inner.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(Self::map_error(key, "delete", e)),
        }
    }
}
