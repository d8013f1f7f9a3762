//! Error types for the book listing store.

use thiserror::Error;

/// Failure reported by a key-value storage backend.
///
/// Backends don't know whether the store was reading or writing when they
/// failed; [`crate::book_store::BookStore`] classifies the fault.
#[derive(Debug, Error)]
pub enum StorageFault {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// All errors that can occur within the FlipShelf core.
#[derive(Debug, Error)]
pub enum BookStoreError {
    /// Storage could not be read.
    #[error("Storage read error: {0}")]
    StorageRead(StorageFault),

    /// A value exists under the storage key but is not a list of books.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// Storage could not be written; nothing was persisted.
    #[error("Storage write error: {0}")]
    StorageWrite(StorageFault),

    /// A required field was empty or invalid when submitting a listing.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The user denied camera or photo library access.
    #[error("Image permission denied: {0}")]
    ImagePermissionDenied(String),
}

/// Convenience alias that pins the error type to [`BookStoreError`].
pub type Result<T> = std::result::Result<T, BookStoreError>;

impl BookStoreError {
    /// Returns a short, human-readable message suitable for an alert.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::StorageRead(_) => "Could not read your books".to_string(),
            Self::DataCorruption(_) => "Saved books are damaged and could not be loaded".to_string(),
            Self::StorageWrite(_) => "Could not save the book, please try again".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::ImagePermissionDenied(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_message_asks_for_retry() {
        let e = BookStoreError::StorageWrite(StorageFault::Unavailable("disk full".to_string()));
        assert!(e.to_string().contains("disk full"));
        assert!(e.user_message().contains("try again"));
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let e = BookStoreError::Validation("Missing required fields: price".to_string());
        assert_eq!(e.user_message(), "Missing required fields: price");
    }
}
