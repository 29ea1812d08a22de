//! Indexer facade
//!
//! [`Indexer`] wires configuration, the JSON store, the fetcher, the crawl
//! engine and the content reader together and exposes the operations the
//! command line and interactive shell use.

use crate::config::Config;
use crate::crawler::{CrawlReport, CrawlRequest, Crawler, Fetcher};
use crate::model::{Documentation, Page};
use crate::reader::{ContentReader, PageContent};
use crate::storage::{open_store, DocumentationStore, JsonStore, NameLock};
use crate::IndexerError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Entry point for crawling, listing and reading documentation
pub struct Indexer {
    store: Arc<JsonStore>,
    crawler: Crawler,
    reader: ContentReader,
}

impl Indexer {
    /// Creates an indexer with the store the configuration resolves to
    ///
    /// # Returns
    ///
    /// * `Ok(Indexer)` - Ready to use
    /// * `Err(IndexerError)` - The store could not be opened or the HTTP
    ///   client could not be built
    pub fn new(config: Config) -> Result<Self, IndexerError> {
        let store = open_store(&config)?;
        Self::with_store(&config, store)
    }

    /// Creates an indexer around an already opened store
    pub fn with_store(config: &Config, store: JsonStore) -> Result<Self, IndexerError> {
        let fetcher = Fetcher::new(config)?;
        let store = Arc::new(store);
        let crawler = Crawler::new(
            fetcher.clone(),
            config.crawler.max_concurrent_fetches as usize,
        );
        let reader = ContentReader::new(store.clone(), fetcher);

        Ok(Self {
            store,
            crawler,
            reader,
        })
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Crawls a site and saves the result under `name`
    ///
    /// Any previous snapshot for `name` is replaced in full.
    pub async fn crawl(
        &self,
        name: &str,
        base_url: &str,
        prefix: &str,
    ) -> Result<CrawlReport, IndexerError> {
        let request = CrawlRequest::new(name, base_url, prefix);
        self.crawl_with_cancellation(&request, CancellationToken::new())
            .await
    }

    /// Crawls a site and saves the result, stopping early if `cancel` fires
    ///
    /// The per-name lock is held from before the crawl until the snapshot is
    /// written, so concurrent crawls of the same name run one after the
    /// other. A cancelled crawl saves nothing.
    pub async fn crawl_with_cancellation(
        &self,
        request: &CrawlRequest,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, IndexerError> {
        request.validate()?;

        let _lock = self.acquire_lock(&request.name).await?;

        let crawler = self.crawler.clone().with_cancellation(cancel);
        let report = crawler.crawl(request).await?;

        let path = self.store.save(&report.documentation)?;
        tracing::info!(
            "Saved '{}' ({} pages) to {}",
            request.name,
            report.pages_indexed(),
            path.display()
        );

        Ok(report)
    }

    async fn acquire_lock(&self, name: &str) -> Result<NameLock, IndexerError> {
        if let Some(lock) = self.store.try_lock(name)? {
            return Ok(lock);
        }

        tracing::info!("Another crawl of '{}' is running, waiting for it", name);

        let store = Arc::clone(&self.store);
        let owned_name = name.to_string();
        let lock = tokio::task::spawn_blocking(move || store.lock(&owned_name))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))??;

        Ok(lock)
    }

    /// Names of all stored documentation, sorted
    pub fn list_documentations(&self) -> Result<Vec<String>, IndexerError> {
        Ok(self.store.list_names()?)
    }

    /// Loads the stored record for `name`
    pub fn documentation(&self, name: &str) -> Result<Documentation, IndexerError> {
        Ok(self.store.load(name)?)
    }

    /// Pages indexed under `name`, in crawl order
    pub fn list_pages(&self, name: &str) -> Result<Vec<Page>, IndexerError> {
        Ok(self.documentation(name)?.pages)
    }

    /// Fetches one indexed page live and converts it to text
    pub async fn read_page(&self, name: &str, url: &str) -> Result<PageContent, IndexerError> {
        self.reader.read_page(name, url).await
    }

    /// Removes the stored record for `name`
    pub fn delete(&self, name: &str) -> Result<bool, IndexerError> {
        let deleted = self.store.delete(name)?;
        tracing::info!("Deleted documentation '{}'", name);
        Ok(deleted)
    }
}
