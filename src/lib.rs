//! Docs-Indexer: crawl, index and read documentation sites
//!
//! This crate crawls a documentation website under a URL prefix, persists an
//! index of the discovered pages, and later re-fetches individual pages on
//! demand, converting them to readable text.

pub mod config;
pub mod crawler;
pub mod indexer;
pub mod model;
pub mod output;
pub mod reader;
pub mod shell;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Docs-Indexer operations
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Documentation '{name}' not found")]
    NotFound { name: String },

    #[error("Page {url} not found in documentation '{name}'")]
    PageNotFound { name: String, url: String },

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Failed to convert {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<storage::StorageError> for IndexerError {
    fn from(err: storage::StorageError) -> Self {
        match err {
            storage::StorageError::NotFound(name) => Self::NotFound { name },
            storage::StorageError::InvalidName(message) => Self::InvalidInput(message),
            other => Self::Storage(other),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not determine a home directory for the store")]
    NoHomeDir,
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Docs-Indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

// Re-export commonly used types
pub use config::Config;
pub use indexer::Indexer;
pub use model::{Documentation, Page};
pub use state::UrlState;
pub use crate::url::{is_within_prefix, normalize};
