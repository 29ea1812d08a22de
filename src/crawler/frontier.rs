//! Crawl frontier: the work list and visited set of one crawl run
//!
//! The frontier is a LIFO stack. Links found on a page are pushed in reverse
//! so the first link on the page is expanded next, which reproduces a
//! depth-first pre-order walk of the link graph without recursion.
//!
//! Duplicates are filtered when a URL is popped, not when it is pushed: the
//! stack may hold the same URL several times, but [`Frontier::next`] only
//! hands out each normalized URL once.

use crate::state::{SkipReason, UrlState};
use crate::url::{normalize_parsed, strip_fragment};
use std::collections::HashSet;
use url::Url;

/// Work list plus visited set for a single crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be processed; the end of the vector is the top
    stack: Vec<String>,

    /// Normalized URLs already handed out for fetching
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            stack: vec![seed.into()],
            visited: HashSet::new(),
        }
    }

    /// Pushes the links of one page
    ///
    /// The first link in `links` will be the next one popped.
    pub fn push_links<S: AsRef<str>>(&mut self, links: &[S]) {
        self.stack
            .extend(links.iter().rev().map(|link| link.as_ref().to_string()));
    }

    /// Takes the next URL off the work list
    ///
    /// Normalizes it and checks-and-marks the visited set in one step:
    ///
    /// - `Pending` - newly visited; fetch `url` and index it as `normalized`
    /// - `Skipped` - already visited, or not a valid HTTP(S) URL
    /// - `Done` - the work list is empty
    pub fn next(&mut self) -> UrlState {
        let Some(url) = self.stack.pop() else {
            return UrlState::Done;
        };

        let parsed = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(e) => {
                return UrlState::Skipped {
                    url,
                    reason: SkipReason::InvalidUrl(e.to_string()),
                }
            }
        };

        let normalized = match normalize_parsed(parsed.clone()) {
            Ok(normalized) => String::from(normalized),
            Err(e) => {
                return UrlState::Skipped {
                    url,
                    reason: SkipReason::InvalidUrl(e.to_string()),
                }
            }
        };

        if !self.visited.insert(normalized.clone()) {
            return UrlState::Skipped {
                url,
                reason: SkipReason::Duplicate,
            };
        }

        UrlState::Pending {
            url: strip_fragment(&parsed).into(),
            normalized,
        }
    }

    /// Number of distinct normalized URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of entries still on the work list, duplicates included
    pub fn pending_count(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Reports where a URL stands in this run, if the frontier has seen it
    pub fn state_of(&self, url: &str) -> Option<UrlState> {
        let parsed = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Some(UrlState::Skipped {
                    url: url.to_string(),
                    reason: SkipReason::InvalidUrl(e.to_string()),
                })
            }
        };
        let normalized = match normalize_parsed(parsed.clone()) {
            Ok(normalized) => String::from(normalized),
            Err(e) => {
                return Some(UrlState::Skipped {
                    url: url.to_string(),
                    reason: SkipReason::InvalidUrl(e.to_string()),
                })
            }
        };

        if self.visited.contains(&normalized) {
            return Some(UrlState::Visited { normalized });
        }

        let queued = self.stack.iter().any(|entry| {
            Url::parse(entry.trim())
                .ok()
                .and_then(|u| normalize_parsed(u).ok())
                .is_some_and(|u| u.as_str() == normalized)
        });

        queued.then(|| UrlState::Pending {
            url: strip_fragment(&parsed).into(),
            normalized,
        })
    }
}
