use super::normalize::normalize;

/// Checks whether a URL falls inside a crawl prefix
///
/// The URL is normalized first and then compared with a plain string prefix
/// test. The comparison is not path-segment aware, so the prefix
/// `https://x.com/doc` also accepts `https://x.com/docs-other`.
///
/// URLs that fail to normalize (malformed, relative, or non-HTTP schemes)
/// are never within a prefix.
///
/// # Examples
///
/// ```
/// use docs_indexer::url::is_within_prefix;
///
/// assert!(is_within_prefix("https://x.com/doc/intro?a=1", "https://x.com/doc"));
/// assert!(!is_within_prefix("https://x.com/blog", "https://x.com/doc"));
/// ```
pub fn is_within_prefix(url: &str, prefix: &str) -> bool {
    match normalize(url) {
        Ok(normalized) => normalized.starts_with(prefix),
        Err(e) => {
            tracing::trace!("Treating {} as outside prefix: {}", url, e);
            false
        }
    }
}
