//! JSON file storage implementation
//!
//! This module provides a directory-backed implementation of the
//! DocumentationStore trait. Each record lives at
//! `<base>/docs/<name>/meta.json`.

use crate::model::Documentation;
use crate::storage::traits::{DocumentationStore, StorageError, StorageResult};
use crate::storage::validate_name;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const DOCS_DIR: &str = "docs";
const LOCKS_DIR: &str = "locks";
const META_FILE: &str = "meta.json";

/// JSON file storage backend
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// Creates a store rooted at `base_dir`, creating its directories
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Root directory of the store
    ///
    /// # Returns
    ///
    /// * `Ok(JsonStore)` - Store ready for use
    /// * `Err(StorageError)` - Failed to create the directory layout
    pub fn new(base_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let store = Self {
            base_dir: base_dir.into(),
        };
        fs::create_dir_all(store.docs_dir())?;
        fs::create_dir_all(store.locks_dir())?;
        Ok(store)
    }

    /// Directory holding one subdirectory per documentation
    pub fn docs_dir(&self) -> PathBuf {
        self.base_dir.join(DOCS_DIR)
    }

    fn locks_dir(&self) -> PathBuf {
        self.base_dir.join(LOCKS_DIR)
    }

    /// Directory for a specific documentation
    pub fn doc_dir(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.docs_dir().join(name))
    }

    /// Path to the meta.json file for a documentation
    pub fn meta_path(&self, name: &str) -> StorageResult<PathBuf> {
        Ok(self.doc_dir(name)?.join(META_FILE))
    }

    fn lock_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.locks_dir().join(format!("{}.lock", name)))
    }

    fn open_lock_file(&self, name: &str) -> StorageResult<(File, PathBuf)> {
        let path = self.lock_path(name)?;
        fs::create_dir_all(self.locks_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        Ok((file, path))
    }

    /// Takes the advisory lock for `name`, blocking until it is free
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn lock(&self, name: &str) -> StorageResult<NameLock> {
        let (file, path) = self.open_lock_file(name)?;
        file.lock_exclusive().map_err(|source| StorageError::Lock {
            name: name.to_string(),
            source,
        })?;
        tracing::debug!("Acquired lock {}", path.display());
        Ok(NameLock { file, path })
    }

    /// Takes the advisory lock for `name` if nobody else holds it
    pub fn try_lock(&self, name: &str) -> StorageResult<Option<NameLock>> {
        let (file, path) = self.open_lock_file(name)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!("Acquired lock {}", path.display());
                Ok(Some(NameLock { file, path }))
            }
            Err(_) => Ok(None),
        }
    }

    /// Modification time of a record file as an RFC 3339 string
    fn modified_timestamp(path: &Path) -> Option<String> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Utc>::from(modified).to_rfc3339())
    }
}

impl DocumentationStore for JsonStore {
    fn save(&self, doc: &Documentation) -> StorageResult<PathBuf> {
        validate_name(&doc.name)?;
        doc.validate().map_err(StorageError::InvalidRecord)?;

        let mut record = doc.clone();
        record.ensure_last_synced();

        let dir = self.doc_dir(&record.name)?;
        fs::create_dir_all(&dir)?;

        let path = dir.join(META_FILE);
        let json = serde_json::to_string_pretty(&record)?;

        // Write to a temp file first so readers never see a partial record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path)?;
        }
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(
            "Saved {} pages for '{}' to {}",
            record.pages.len(),
            record.name,
            path.display()
        );
        Ok(path)
    }

    fn load(&self, name: &str) -> StorageResult<Documentation> {
        let path = self.meta_path(name)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let json = fs::read_to_string(&path)?;
        let mut doc: Documentation =
            serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        doc.validate().map_err(|message| StorageError::Corrupt {
            name: name.to_string(),
            message,
        })?;

        if doc.name != name {
            return Err(StorageError::Corrupt {
                name: name.to_string(),
                message: format!("record is named '{}'", doc.name),
            });
        }

        if doc.last_synced.is_none() {
            doc.last_synced = Self::modified_timestamp(&path);
            doc.ensure_last_synced();
        }

        Ok(doc)
    }

    fn list_names(&self) -> StorageResult<Vec<String>> {
        let docs_dir = self.docs_dir();
        if !docs_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&docs_dir)?.flatten() {
            let path = entry.path();
            if !path.is_dir() || !path.join(META_FILE).is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> StorageResult<bool> {
        let dir = self.doc_dir(name)?;
        if !dir.join(META_FILE).is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        fs::remove_dir_all(&dir)?;
        tracing::debug!("Deleted documentation '{}'", name);
        Ok(true)
    }

    fn exists(&self, name: &str) -> bool {
        self.meta_path(name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}

/// Guard for a per-name advisory lock
///
/// Serializes crawls of the same documentation name across processes.
#[derive(Debug)]
pub struct NameLock {
    file: File,
    path: PathBuf,
}

impl NameLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for NameLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}
