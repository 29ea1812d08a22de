use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical key used for dedup and prefix matching
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the query string
/// 5. Remove the fragment
///
/// Scheme, host (with any port) and path are kept as the URL parser
/// serializes them, so an empty path becomes `/`. Applying the function to
/// its own output returns the same string.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use docs_indexer::url::normalize;
///
/// let url = normalize("https://docs.example.com/guide?tab=1#install").unwrap();
/// assert_eq!(url, "https://docs.example.com/guide");
/// ```
pub fn normalize(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(normalize_parsed(url)?.into())
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Returns a copy of the URL with its fragment removed
///
/// The query string is kept: pages are fetched with it, only the index key
/// drops it.
pub fn strip_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}
