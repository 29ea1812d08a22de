//! HTML to readable text conversion
//!
//! Pages are rendered as Markdown: links keep their text and target as
//! `[text](href)` and images keep their alt text and source as
//! `![alt](src)`. Script and style contents are dropped.

use htmd::HtmlToMarkdown;

/// Converts an HTML document to Markdown-flavoured text
///
/// # Returns
///
/// * `Ok(String)` - The converted text
/// * `Err(String)` - The converter rejected the document
pub fn html_to_text(html: &str) -> Result<String, String> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();

    converter
        .convert(html)
        .map(|text| text.trim().to_string())
        .map_err(|e| format!("failed to convert HTML to text: {}", e))
}
