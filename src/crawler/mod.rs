//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and link extraction
//! - The frontier (work list and visited set)
//! - Overall crawl coordination

mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use engine::{CrawlFailure, CrawlReport, CrawlRequest, Crawler};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use frontier::Frontier;
pub use parser::{extract, ParsedPage};
