//! URL handling module for Docs-Indexer
//!
//! This module provides URL normalization (the canonical key used for dedup
//! and storage) and the prefix filter that bounds a crawl.

mod normalize;
mod prefix;

// Re-export main functions
pub use normalize::{normalize, normalize_parsed, strip_fragment};
pub use prefix::is_within_prefix;
