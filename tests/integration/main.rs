//! Integration tests for docs-indexer
//!
//! These tests run the indexer against wiremock servers with stores in
//! temporary directories.

mod crawl_tests;
mod read_tests;
