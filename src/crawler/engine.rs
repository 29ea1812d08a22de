//! Crawl engine
//!
//! This module runs one crawl of a documentation site:
//! - Validates the crawl request
//! - Drives the frontier, keeping a bounded number of fetches in flight
//! - Extracts titles and in-scope links from fetched pages
//! - Collects per-URL failures without aborting the crawl
//! - Stops early when the cancellation token fires

use super::fetcher::{FetchError, FetchedPage, Fetcher};
use super::frontier::Frontier;
use super::parser::extract;
use crate::model::{Documentation, Page};
use crate::state::{SkipReason, UrlState};
use crate::storage::validate_name;
use crate::url::{is_within_prefix, normalize};
use crate::IndexerError;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Log a progress line every this many indexed pages
const PROGRESS_INTERVAL: usize = 10;

/// Parameters of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Storage key for the resulting documentation
    pub name: String,

    /// Seed URL
    pub base_url: String,

    /// Only normalized URLs starting with this string are followed
    pub prefix: String,
}

impl CrawlRequest {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            prefix: prefix.into(),
        }
    }

    /// Checks the request before any network activity
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The normalized seed URL
    /// * `Err(IndexerError::InvalidInput)` - Bad name, malformed seed URL,
    ///   or empty prefix
    ///
    /// A seed outside the prefix is accepted: it is fetched for its links
    /// but not indexed.
    pub fn validate(&self) -> Result<String, IndexerError> {
        validate_name(&self.name)?;

        if self.prefix.trim().is_empty() {
            return Err(IndexerError::InvalidInput(
                "prefix cannot be empty".to_string(),
            ));
        }

        let seed = normalize(&self.base_url).map_err(|e| {
            IndexerError::InvalidInput(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;

        Ok(seed)
    }
}

/// A URL that could not be indexed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The freshly built record, stamped with the completion time
    pub documentation: Documentation,

    /// URLs that failed to fetch, in the order they failed
    pub failures: Vec<CrawlFailure>,

    /// Work-list entries discarded because their normalized URL was visited
    pub duplicates_skipped: usize,

    /// Work-list entries discarded because they were not valid HTTP(S) URLs
    pub invalid_skipped: usize,

    /// Fetched pages not indexed because they, or their redirect target,
    /// lie outside the prefix; their in-scope links are still followed
    pub outside_prefix: usize,

    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn pages_indexed(&self) -> usize {
        self.documentation.page_count()
    }
}

/// Result of one spawned fetch task
struct FetchOutcome {
    url: String,
    normalized: String,
    result: Result<FetchedPage, FetchError>,
}

/// Mutable state of a crawl in progress, owned by the coordinating loop
struct CrawlRun {
    frontier: Frontier,
    documentation: Documentation,
    failures: Vec<CrawlFailure>,
    duplicates_skipped: usize,
    invalid_skipped: usize,
    outside_prefix: usize,
}

/// Runs crawls with a shared fetcher
///
/// The visited set lives in the single coordinating loop; fetch tasks only
/// perform I/O. With `max_concurrent_fetches == 1` pages come out in
/// depth-first pre-order following link order on each page. With more
/// fetches in flight, pages are recorded in fetch-completion order.
#[derive(Debug, Clone)]
pub struct Crawler {
    fetcher: Fetcher,
    max_concurrent_fetches: usize,
    cancel: CancellationToken,
}

impl Crawler {
    pub fn new(fetcher: Fetcher, max_concurrent_fetches: usize) -> Self {
        Self {
            fetcher,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the token that aborts crawls run by this crawler
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Crawls everything reachable from the seed within the prefix
    ///
    /// Per-URL fetch failures are logged and reported in
    /// [`CrawlReport::failures`]; they never fail the crawl. Nothing is
    /// persisted here.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl ran to completion
    /// * `Err(IndexerError::InvalidInput)` - The request was rejected
    /// * `Err(IndexerError::Cancelled)` - The cancellation token fired
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlReport, IndexerError> {
        let seed = request.validate()?;
        let start = Instant::now();

        tracing::info!(
            "Starting crawl of '{}' from {} (prefix {})",
            request.name,
            seed,
            request.prefix
        );

        let mut run = CrawlRun {
            frontier: Frontier::new(request.base_url.trim()),
            documentation: Documentation::new(&request.name, &request.base_url, &request.prefix),
            failures: Vec::new(),
            duplicates_skipped: 0,
            invalid_skipped: 0,
            outside_prefix: 0,
        };
        let mut in_flight: JoinSet<FetchOutcome> = JoinSet::new();
        let mut last_progress = 0;

        loop {
            self.fill(&mut run, &mut in_flight);

            if in_flight.is_empty() {
                if self.cancel.is_cancelled() {
                    return Err(self.cancelled(request, &run));
                }
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    in_flight.abort_all();
                    return Err(self.cancelled(request, &run));
                }
                joined = in_flight.join_next() => joined,
            };

            match joined {
                Some(Ok(outcome)) => record_outcome(&mut run, outcome, &request.prefix),
                Some(Err(e)) => tracing::error!("Fetch task failed: {}", e),
                None => {}
            }

            let indexed = run.documentation.page_count();
            if indexed >= last_progress + PROGRESS_INTERVAL {
                last_progress = indexed;
                let elapsed = start.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages indexed, {} failed, {} queued ({:.1} pages/sec)",
                    indexed,
                    run.failures.len(),
                    run.frontier.pending_count(),
                    indexed as f64 / elapsed.max(f64::EPSILON)
                );
            }
        }

        run.documentation.mark_synced();
        let elapsed = start.elapsed();

        tracing::info!(
            "Indexed {} pages for '{}' in {:.1}s ({} failed, {} duplicates skipped)",
            run.documentation.page_count(),
            request.name,
            elapsed.as_secs_f64(),
            run.failures.len(),
            run.duplicates_skipped
        );

        Ok(CrawlReport {
            documentation: run.documentation,
            failures: run.failures,
            duplicates_skipped: run.duplicates_skipped,
            invalid_skipped: run.invalid_skipped,
            outside_prefix: run.outside_prefix,
            elapsed,
        })
    }

    /// Pops work until the fetch limit is reached or the frontier runs dry
    fn fill(&self, run: &mut CrawlRun, in_flight: &mut JoinSet<FetchOutcome>) {
        while in_flight.len() < self.max_concurrent_fetches && !self.cancel.is_cancelled() {
            match run.frontier.next() {
                UrlState::Pending { url, normalized } => {
                    tracing::info!("Indexing {}", url);
                    let fetcher = self.fetcher.clone();
                    in_flight.spawn(async move {
                        let result = fetcher.fetch(&url).await;
                        FetchOutcome {
                            url,
                            normalized,
                            result,
                        }
                    });
                }
                UrlState::Skipped { url, reason } => {
                    match reason {
                        SkipReason::Duplicate => run.duplicates_skipped += 1,
                        SkipReason::InvalidUrl(_) => run.invalid_skipped += 1,
                    }
                    tracing::trace!("Skipped {}: {}", url, reason);
                }
                UrlState::Visited { .. } => {}
                UrlState::Done => break,
            }
        }
    }

    fn cancelled(&self, request: &CrawlRequest, run: &CrawlRun) -> IndexerError {
        tracing::warn!(
            "Crawl of '{}' cancelled after {} pages; nothing was saved",
            request.name,
            run.documentation.page_count()
        );
        IndexerError::Cancelled
    }
}

/// Records one finished fetch and queues its in-scope links
fn record_outcome(run: &mut CrawlRun, outcome: FetchOutcome, prefix: &str) {
    let FetchOutcome {
        url,
        normalized,
        result,
    } = outcome;

    let page = match result {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Error crawling {}: {}", url, e);
            run.failures.push(CrawlFailure {
                url,
                error: e.to_string(),
            });
            return;
        }
    };

    // Relative links resolve against where the page actually ended up
    let base = match Url::parse(&page.final_url).or_else(|_| Url::parse(&url)) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Error crawling {}: {}", url, e);
            run.failures.push(CrawlFailure {
                url,
                error: e.to_string(),
            });
            return;
        }
    };

    let parsed = extract(&page.body, &base);

    let in_scope: Vec<String> = parsed
        .links
        .into_iter()
        .filter(|link| is_within_prefix(link, prefix))
        .collect();
    run.frontier.push_links(&in_scope);

    // Only the seed or a redirect can land outside the prefix
    if !normalized.starts_with(prefix) || !is_within_prefix(base.as_str(), prefix) {
        tracing::debug!(
            "Not indexing {} (final URL {}) outside prefix {}, following {} links",
            normalized,
            base,
            prefix,
            in_scope.len()
        );
        run.outside_prefix += 1;
        return;
    }

    tracing::debug!(
        "Indexed {} ({} bytes, {} in-scope links)",
        normalized,
        page.body.len(),
        in_scope.len()
    );

    let title = parsed.title.unwrap_or_else(|| normalized.clone());
    run.documentation.pages.push(Page::new(title, normalized));
}
