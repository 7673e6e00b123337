use crate::domain::errors::{StorageError, ValidationError};

/// Errors surfaced by gallery operations
///
/// Each variant corresponds to one client-visible outcome; the HTTP adapter
/// decides the status code and whether the error view or raw text is sent.
#[derive(Debug, Clone)]
pub enum GalleryError {
    /// Upload request carried no `file` part
    MissingFile,

    /// Delete request carried no (or an empty) `objectName`
    MissingObjectName,

    /// A key supplied by the client or derived from an upload is unusable
    InvalidKey(ValidationError),

    /// Any failure reported by the object store
    Storage(StorageError),

    /// Preview target could not be looked up, whatever the cause
    ImageNotFound,

    /// Preview target exists but is not an image
    NotAnImage { content_type: String },
}

impl std::fmt::Display for GalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GalleryError::MissingFile => write!(f, "No file uploaded"),
            GalleryError::MissingObjectName => write!(f, "Object name is required"),
            GalleryError::InvalidKey(e) => write!(f, "Invalid object name: {}", e),
            GalleryError::Storage(e) => write!(f, "{}", e),
            GalleryError::ImageNotFound => write!(f, "Image not found"),
            GalleryError::NotAnImage { .. } => write!(f, "File is not an image"),
        }
    }
}

impl std::error::Error for GalleryError {}

impl From<StorageError> for GalleryError {
    fn from(err: StorageError) -> Self {
        GalleryError::Storage(err)
    }
}

impl From<ValidationError> for GalleryError {
    fn from(err: ValidationError) -> Self {
        GalleryError::InvalidKey(err)
    }
}

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;
