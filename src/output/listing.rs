//! Listings of stored documentation and their pages

use crate::model::{Documentation, Page};
use crate::IndexerError;

/// Placeholder shown for records saved without a sync time
const NEVER_SYNCED: &str = "never";

/// Formats one stored record as a single summary line
///
/// # Example
///
/// ```
/// use docs_indexer::model::Documentation;
/// use docs_indexer::output::format_documentation_line;
///
/// let mut doc = Documentation::new("book", "https://a.com/", "https://a.com/");
/// doc.last_synced = Some("2024-01-01T00:00:00+00:00".to_string());
/// assert_eq!(
///     format_documentation_line(&doc),
///     "book - 0 pages, last synced: 2024-01-01T00:00:00+00:00"
/// );
/// ```
pub fn format_documentation_line(doc: &Documentation) -> String {
    format!(
        "{} - {} pages, last synced: {}",
        doc.name,
        doc.page_count(),
        doc.last_synced.as_deref().unwrap_or(NEVER_SYNCED)
    )
}

/// Formats a listing entry, including records that failed to load
pub fn format_documentation_entry(
    name: &str,
    loaded: &Result<Documentation, IndexerError>,
) -> String {
    match loaded {
        Ok(doc) => format_documentation_line(doc),
        Err(e) => format!("{} - error loading documentation: {}", name, e),
    }
}

/// Formats pages as a numbered list, each title followed by its indented URL
pub fn format_page_list(pages: &[Page]) -> String {
    if pages.is_empty() {
        return "No pages indexed.\n".to_string();
    }

    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, page.title));
        out.push_str(&format!("   {}\n", page.url));
    }
    out
}
