//! Storage layer
//!
//! The book list lives in a single JSON file that is rewritten in full,
//! atomically, on every change. A small sidecar file next to it holds the
//! id counter so ids are never reused after deletions.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
