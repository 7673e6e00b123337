use crate::domain::errors::ValidationError;

const MAX_KEY_LEN: usize = 1024;

/// A validated object key in the gallery bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        Self::check_storable(&value)?;

        if value.starts_with('/') {
            return Err(ValidationError::ObjectKeyStartsWithSlash);
        }

        if value.contains("//") {
            return Err(ValidationError::ObjectKeyContainsDoubleSlash);
        }

        Ok(Self(value))
    }

    /// Build the key for a freshly uploaded file: `<unix-millis>-<file name>`.
    ///
    /// The millisecond prefix keeps two uploads of the same file name apart.
    /// The file name is taken as sent; only limits the store itself enforces
    /// are checked.
    pub fn for_upload(timestamp_millis: i64, file_name: &str) -> Result<Self, ValidationError> {
        let value = format!("{}-{}", timestamp_millis, file_name);
        Self::check_storable(&value)?;
        Ok(Self(value))
    }

    fn check_storable(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }

        if value.len() > MAX_KEY_LEN {
            return Err(ValidationError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LEN,
            });
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidObjectKeyCharacter('\0'));
        }

        Ok(())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
