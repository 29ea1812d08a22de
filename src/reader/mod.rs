//! Content reader
//!
//! Reads one indexed page on demand: the page must be present in a stored
//! documentation index, its live content is fetched fresh, and the HTML is
//! converted to readable text. Nothing is cached from crawl time.

mod convert;

pub use convert::html_to_text;

use crate::crawler::Fetcher;
use crate::storage::DocumentationStore;
use crate::url::normalize;
use crate::IndexerError;
use std::fmt;
use std::sync::Arc;

/// A page as returned to readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Title stored in the index, not re-extracted from the live page
    pub title: String,

    /// Normalized URL of the page
    pub url: String,

    /// Converted page text
    pub text: String,
}

impl PageContent {
    /// Formats the page as a heading line followed by its text
    pub fn render(&self) -> String {
        format!("# {}\n{}", self.title, self.text)
    }
}

impl fmt::Display for PageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Reads pages from stored documentation indexes
#[derive(Clone)]
pub struct ContentReader {
    store: Arc<dyn DocumentationStore>,
    fetcher: Fetcher,
}

impl ContentReader {
    pub fn new(store: Arc<dyn DocumentationStore>, fetcher: Fetcher) -> Self {
        Self { store, fetcher }
    }

    /// Fetches and converts one indexed page
    ///
    /// The URL is normalized and must equal a stored page URL exactly. Indexes
    /// written with unnormalized URLs (for example a site root without its
    /// trailing slash) are matched on the URL as given, minus query and
    /// fragment.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// * `IndexerError::NotFound` - No documentation is stored under `name`
    /// * `IndexerError::InvalidInput` - `url` is not a valid HTTP(S) URL
    /// * `IndexerError::PageNotFound` - The documentation has no such page
    /// * `IndexerError::Fetch` - The live fetch failed
    /// * `IndexerError::Parse` - The HTML could not be converted
    pub async fn read_page(&self, name: &str, url: &str) -> Result<PageContent, IndexerError> {
        let documentation = self.store.load(name)?;

        let normalized = normalize(url)
            .map_err(|e| IndexerError::InvalidInput(format!("invalid page URL '{}': {}", url, e)))?;

        let page = documentation
            .page_by_url(&normalized)
            .or_else(|| documentation.page_by_url(without_query_or_fragment(url)))
            .ok_or_else(|| IndexerError::PageNotFound {
                name: name.to_string(),
                url: normalized.clone(),
            })?;

        tracing::debug!("Reading {} from '{}'", page.url, name);
        let fetched = self.fetcher.fetch(&page.url).await?;

        let text = html_to_text(&fetched.body).map_err(|message| IndexerError::Parse {
            url: page.url.clone(),
            message,
        })?;

        Ok(PageContent {
            title: page.title.clone(),
            url: page.url.clone(),
            text,
        })
    }
}

/// The URL as given, cut at the first `?` or `#`
fn without_query_or_fragment(url: &str) -> &str {
    url.trim().split(['?', '#']).next().unwrap_or_default()
}
