//! URL handling module for Link-Cartographer
//!
//! This module resolves raw hrefs into absolute URLs and decides, for each
//! discovered URL, whether it is recorded in the graph and whether it is
//! followed.

mod resolve;
mod scope;

use crate::config::CrawlerConfig;
use crate::{ConfigError, UrlError};
use regex::Regex;
use url::Url;

// Re-export main functions
pub use resolve::resolve_href;
pub use scope::{extract_domain, matches_wildcard};

/// Decides which discovered URLs are recorded and which are followed
///
/// Two independent predicates:
/// - [`FilterPolicy::accept`]: the URL matches the inclusion pattern, so it
///   becomes a graph node and edge target
/// - [`FilterPolicy::is_in_scope`]: the URL's host is allowed, so it may be
///   claimed and fetched
///
/// # Examples
///
/// ```
/// use link_cartographer::url::FilterPolicy;
///
/// let policy = FilterPolicy::new("(http://.*|https://.*)", vec!["a.test".to_string()]).unwrap();
/// assert!(policy.accept("https://other.test/x"));
/// assert!(!policy.accept("mailto:x@a.test"));
/// assert!(!policy.is_in_scope("https://other.test/x"));
/// assert!(policy.is_in_scope("https://a.test/b"));
/// ```
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    pattern: Regex,
    allowed_domains: Vec<String>,
}

impl FilterPolicy {
    /// Creates a policy from a regex and a list of allowed domain patterns
    ///
    /// The pattern is anchored at the start of the URL when compiled.
    pub fn new(pattern: &str, allowed_domains: Vec<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{})", pattern))?,
            allowed_domains: allowed_domains
                .into_iter()
                .map(|d| d.to_lowercase())
                .collect(),
        })
    }

    /// Builds the policy described by a crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Self::new(&config.url_pattern, config.effective_allowed_domains())
    }

    /// Resolves a raw href found on `base` into an absolute URL
    pub fn resolve(&self, href: &str, base: &Url) -> Result<Url, UrlError> {
        resolve_href(href, base)
    }

    /// Returns true if `url` matches the inclusion pattern
    ///
    /// The match must begin at the first character; a pattern matching only
    /// somewhere inside the URL does not count.
    pub fn accept(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    /// Returns true if `url` should be followed (its host is allowed)
    ///
    /// Unparseable URLs and URLs without a host are never in scope.
    pub fn is_in_scope(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| extract_domain(&u))
            .map_or(false, |host| {
                self.allowed_domains
                    .iter()
                    .any(|pattern| matches_wildcard(pattern, &host))
            })
    }

    /// The lowercase allowed-domain patterns
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }
}
