//! HTML parser for extracting links and the page title
//!
//! This module handles parsing HTML content to extract:
//! - The page title (first `<title>` element)
//! - Links to follow (every `<a href>` on the page, in document order)

use crate::url::strip_fragment;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from the first <title> tag), trimmed
    pub title: Option<String>,

    /// All links found on the page (absolute URLs, fragments stripped)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts the title and outbound links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - Every `<a href="...">`, in document order, resolved against `base_url`
///   with standard URL joining (relative paths, protocol-relative URLs and
///   same-document fragments)
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Anything that does not resolve to an HTTP(S) URL
///
/// Fragments are stripped from every link; query strings are kept.
/// Duplicate links are not removed here.
///
/// Parsing never fails: malformed markup yields whatever the HTML5 parser
/// recovers, which for garbage input is no title and no links.
///
/// # Example
///
/// ```
/// use docs_indexer::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = extract(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL without its fragment
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(strip_fragment(&absolute_url).into())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::trace!("Skipping unresolvable link {:?}: {}", href, e);
            None
        }
    }
}
