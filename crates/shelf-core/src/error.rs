//! Catalog errors
//!
//! "Not found" is never an error here: lookups return `Option` and
//! mutations by id return `bool`.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the store and catalog
#[derive(Error, Debug)]
pub enum Error {
    /// Search requested on a field books don't have
    #[error("Invalid search field \"{field}\". Available fields: {allowed}")]
    InvalidField { field: String, allowed: String },

    /// Status string outside the two canonical values
    #[error("Invalid status \"{0}\". Expected one of: in stock, checked out")]
    InvalidStatus(String),

    /// The id counter has reached `u64::MAX`
    #[error("No ids left to assign")]
    IdsExhausted,

    /// Backing file could not be read, parsed or written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_invalid_field_lists_allowed() {
        let err = Error::InvalidField {
            field: "isbn".to_string(),
            allowed: "id, title".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("isbn"));
        assert!(msg.contains("id, title"));
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: Error = StorageError::InvalidFormat {
            path: PathBuf::from("/data/books.json"),
            details: "expected value".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Invalid data format"));
    }
}
