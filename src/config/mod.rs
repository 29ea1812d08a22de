//! Configuration module for Docs-Indexer
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and resolving where the documentation store lives.
//!
//! # Example
//!
//! ```no_run
//! use docs_indexer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docs-indexer.toml")).unwrap();
//! println!("Request timeout: {}s", config.crawler.request_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, StoreConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    load_config, load_config_or_default, parse_config, resolve_base_dir, HOME_ENV_VAR,
};
