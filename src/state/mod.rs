//! State module for tracking crawl progress
//!
//! Each crawl run tracks the URLs it takes off its work list with
//! [`UrlState`]: `Pending` when about to be fetched, `Visited` once recorded,
//! `Skipped` when discarded (duplicates, unparseable URLs), and `Done` when
//! the work list is exhausted.

mod url_state;

// Re-export main types
pub use url_state::{SkipReason, UrlState};
