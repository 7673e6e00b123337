use crate::domain::value_objects::ObjectKey;

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Object not found
    ObjectNotFound { key: ObjectKey },

    /// Validation error
    ValidationError { message: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl StorageError {
    pub fn infrastructure(message: impl Into<String>, source: impl std::fmt::Display) -> Self {
        StorageError::InfrastructureError {
            message: message.into(),
            source: Some(source.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::ObjectNotFound { .. })
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::InfrastructureError { message, source } => match source {
                Some(source) => write!(f, "Infrastructure error: {}: {}", message, source),
                None => write!(f, "Infrastructure error: {}", message),
            },
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
