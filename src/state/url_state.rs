/// Crawl state definitions for a single URL
///
/// Every URL taken off the work list moves through these states during one
/// crawl run.
use std::fmt;

/// Why a URL taken off the work list was not fetched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The normalized URL was already visited in this run
    Duplicate,

    /// The URL could not be normalized
    InvalidUrl(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate"),
            Self::InvalidUrl(reason) => write!(f, "invalid url: {}", reason),
        }
    }
}

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlState {
    // ===== Active States =====
    /// URL has been marked visited and is about to be fetched
    Pending {
        /// URL as discovered (query string kept, fragment stripped)
        url: String,
        /// Canonical key used for dedup and storage
        normalized: String,
    },

    // ===== Terminal States =====
    /// URL was processed earlier in this run
    Visited {
        /// Canonical key of the visited URL
        normalized: String,
    },

    /// URL was discarded without fetching
    Skipped {
        /// URL as it sat on the work list
        url: String,
        /// Why it was discarded
        reason: SkipReason,
    },

    /// The work list is exhausted
    Done,
}

impl UrlState {
    /// Returns true if no further processing is needed for this state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }

    /// Returns true if the URL was discarded without fetching
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Returns true if the crawl has nothing left to do
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending { normalized, .. } => write!(f, "pending({})", normalized),
            Self::Visited { normalized } => write!(f, "visited({})", normalized),
            Self::Skipped { url, reason } => write!(f, "skipped({}: {})", url, reason),
            Self::Done => write!(f, "done"),
        }
    }
}
