//! Crawl report summary

use crate::crawler::CrawlReport;

/// Most failures listed individually in a summary
const MAX_LISTED_FAILURES: usize = 20;

/// Formats a crawl report as a short human-readable summary
pub fn format_crawl_report(report: &CrawlReport) -> String {
    let doc = &report.documentation;
    let mut out = String::new();

    out.push_str(&format!(
        "Indexed {} pages for '{}' in {:.1}s\n",
        doc.page_count(),
        doc.name,
        report.elapsed.as_secs_f64()
    ));
    out.push_str(&format!("  Prefix: {}\n", doc.prefix));
    if let Some(synced) = &doc.last_synced {
        out.push_str(&format!("  Last synced: {}\n", synced));
    }
    out.push_str(&format!(
        "  Duplicates skipped: {}\n",
        report.duplicates_skipped
    ));
    if report.invalid_skipped > 0 {
        out.push_str(&format!(
            "  Invalid URLs skipped: {}\n",
            report.invalid_skipped
        ));
    }
    if report.outside_prefix > 0 {
        out.push_str(&format!(
            "  Outside prefix (not indexed): {}\n",
            report.outside_prefix
        ));
    }
    out.push_str(&format!("  Failed: {}\n", report.failures.len()));

    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        out.push_str(&format!("    - {}: {}\n", failure.url, failure.error));
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        out.push_str(&format!(
            "    ... and {} more\n",
            report.failures.len() - MAX_LISTED_FAILURES
        ));
    }

    out
}
