use url::Url;

/// Extracts the lowercase host of a URL
///
/// Ports are not part of the host, so `http://127.0.0.1:8080/` yields
/// `127.0.0.1`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_cartographer::url::extract_domain;
///
/// let url = Url::parse("https://Docs.Example.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("docs.example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a host matches an allowed-domain pattern
///
/// Two forms are supported:
/// 1. Exact: `example.com` matches only `example.com`
/// 2. Wildcard: `*.example.com` matches `example.com` and every subdomain
///
/// Both arguments are expected in lowercase.
///
/// # Examples
///
/// ```
/// use link_cartographer::url::matches_wildcard;
///
/// assert!(matches_wildcard("a.test", "a.test"));
/// assert!(!matches_wildcard("a.test", "www.a.test"));
/// assert!(matches_wildcard("*.a.test", "www.a.test"));
/// assert!(!matches_wildcard("*.a.test", "evil-a.test"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base
            || candidate
                .strip_suffix(base)
                .map_or(false, |prefix| prefix.ends_with('.'))
    } else {
        candidate == pattern
    }
}
