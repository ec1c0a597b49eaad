//! HTML parser for extracting raw link targets
//!
//! Hrefs are returned exactly as they appear in the page. Resolution against
//! the page URL and filtering are done by the crawl workers through the
//! [`FilterPolicy`](crate::url::FilterPolicy).

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a>` element in document order
///
/// Anchors without an `href` are skipped; empty and non-http values are kept
/// for the filter policy to reject.
///
/// # Example
///
/// ```
/// use link_cartographer::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/b">B</a><a>none</a><a href="mailto:x@a.test">M</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/b", "mailto:x@a.test"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
