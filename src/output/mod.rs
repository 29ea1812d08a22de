//! Output module for rendering indexer results as plain text
//!
//! This module handles:
//! - Documentation listings (one line per stored record)
//! - Numbered page listings
//! - Crawl report summaries

mod listing;
mod report;

pub use listing::{format_documentation_entry, format_documentation_line, format_page_list};
pub use report::format_crawl_report;
