//! Documentation index records
//!
//! A [`Documentation`] is the persisted index of one crawled site. It is built
//! in memory during a crawl and saved as a single snapshot keyed by `name`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A page discovered during a crawl
///
/// `url` is always the normalized form and identifies the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub url: String,
}

impl Page {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// The persisted index of one documentation site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    /// Storage key; case-sensitive
    pub name: String,

    /// Seed URL the crawl started from
    pub base_url: String,

    /// Scope filter applied to normalized URLs
    pub prefix: String,

    /// Pages in the order they were indexed
    #[serde(default)]
    pub pages: Vec<Page>,

    /// RFC 3339 timestamp of the crawl that produced this snapshot
    #[serde(default)]
    pub last_synced: Option<String>,
}

impl Documentation {
    /// Creates an empty record with no sync timestamp
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            prefix: prefix.into(),
            pages: Vec::new(),
            last_synced: None,
        }
    }

    /// Finds the page whose stored URL equals `url` exactly
    pub fn page_by_url(&self, url: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.url == url)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Stamps the record with the current time
    pub fn mark_synced(&mut self) {
        self.last_synced = Some(now_timestamp());
    }

    /// Fills `last_synced` with the current time if it is absent
    pub fn ensure_last_synced(&mut self) {
        if self.last_synced.is_none() {
            self.mark_synced();
        }
    }

    /// Checks the record's invariants
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if self.prefix.is_empty() {
            return Err("prefix cannot be empty".to_string());
        }

        let mut seen = HashSet::with_capacity(self.pages.len());
        for page in &self.pages {
            if page.url.is_empty() {
                return Err("page url cannot be empty".to_string());
            }
            if !seen.insert(page.url.as_str()) {
                return Err(format!("duplicate page url: {}", page.url));
            }
        }

        Ok(())
    }
}

/// Current time in the format stored in `last_synced`
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}
