//! Storage traits and error types
//!
//! This module defines the trait interface for documentation stores and
//! associated error types.

use crate::model::Documentation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Documentation '{0}' not found")]
    NotFound(String),

    #[error("Invalid documentation name: {0}")]
    InvalidName(String),

    #[error("Refusing to save invalid record: {0}")]
    InvalidRecord(String),

    #[error("Stored record '{name}' is malformed: {message}")]
    Corrupt { name: String, message: String },

    #[error("Failed to lock documentation '{name}': {source}")]
    Lock {
        name: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for documentation store implementations
///
/// A store holds one record per documentation name. Saves replace the whole
/// record; there is no incremental merge and no versioning.
pub trait DocumentationStore: Send + Sync {
    /// Persists a record, replacing any previous snapshot with the same name
    ///
    /// Fills `last_synced` if the record has none.
    ///
    /// # Returns
    ///
    /// The location the record was written to
    fn save(&self, doc: &Documentation) -> StorageResult<PathBuf>;

    /// Loads the record stored under `name`
    ///
    /// Returns `StorageError::NotFound` if there is none and
    /// `StorageError::Corrupt` if the stored record is malformed.
    fn load(&self, name: &str) -> StorageResult<Documentation>;

    /// Lists the names of all stored records, sorted
    fn list_names(&self) -> StorageResult<Vec<String>>;

    /// Removes the record stored under `name`
    ///
    /// Returns `StorageError::NotFound` if there is none.
    fn delete(&self, name: &str) -> StorageResult<bool>;

    /// Checks whether a record exists for `name`
    fn exists(&self, name: &str) -> bool;
}
