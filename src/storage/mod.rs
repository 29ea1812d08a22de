//! Storage module for persisting documentation indexes
//!
//! This module handles all persistence for the indexer:
//! - The `DocumentationStore` trait (save/load/list/delete by name)
//! - A JSON file implementation rooted at an explicit base directory
//! - Per-name advisory locks that serialize crawls of the same name

mod json;
mod traits;

pub use json::{JsonStore, NameLock};
pub use traits::{DocumentationStore, StorageError, StorageResult};

use crate::config::{resolve_base_dir, Config};
use crate::IndexerError;

/// Maximum length of a documentation name
pub const MAX_NAME_LEN: usize = 64;

/// Opens the JSON store at the location the configuration resolves to
///
/// # Arguments
///
/// * `config` - The indexer configuration
///
/// # Returns
///
/// * `Ok(JsonStore)` - Successfully opened store
/// * `Err(IndexerError)` - No base directory could be resolved or created
pub fn open_store(config: &Config) -> Result<JsonStore, IndexerError> {
    let base_dir = resolve_base_dir(config)?;
    tracing::debug!("Using store at {}", base_dir.display());
    Ok(JsonStore::new(base_dir)?)
}

/// Validates that a documentation name is safe to use as a directory name
///
/// Names are case-sensitive and limited to ASCII letters, digits, `-`, `_`
/// and `.`; they may not start with `.` or `-`.
pub fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("name cannot be empty".into()));
    }

    if name.starts_with('-') || name.starts_with('.') {
        return Err(StorageError::InvalidName(format!(
            "'{}' cannot start with '-' or '.'",
            name
        )));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(StorageError::InvalidName(format!(
            "'{}' exceeds maximum length of {} characters",
            name, MAX_NAME_LEN
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(StorageError::InvalidName(format!(
            "'{}' may only contain [A-Za-z0-9._-]",
            name
        )));
    }

    if name.contains("..") {
        return Err(StorageError::InvalidName(format!(
            "'{}' contains path traversal characters",
            name
        )));
    }

    Ok(())
}
