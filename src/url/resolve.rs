use crate::UrlError;
use url::Url;

/// Resolves a raw href against the page it was found on
///
/// Relative references (no host) are joined onto `base`; absolute ones parse
/// on their own. The fragment is dropped so that in-page anchors collapse onto
/// the page itself.
///
/// # Arguments
///
/// * `href` - The raw attribute value as it appeared in the page
/// * `base` - The URL of the referring page
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError)` - The href cannot be turned into a URL
///
/// # Examples
///
/// ```
/// use link_cartographer::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://a.test/docs/").unwrap();
/// let url = resolve_href("intro#top", &base).unwrap();
/// assert_eq!(url.as_str(), "https://a.test/docs/intro");
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    url.set_fragment(None);
    Ok(url)
}
