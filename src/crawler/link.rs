use std::fmt;
use url::Url;

/// A URL together with its hop distance from the start URL
///
/// Links are immutable values. Ordering (depth, then URL) exists for
/// deterministic logs and tests; the work queue does not use it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    depth: u32,
    url: Url,
}

impl Link {
    pub fn new(depth: u32, url: Url) -> Self {
        Self { depth, url }
    }

    /// The start link of a crawl (depth 0)
    pub fn root(url: Url) -> Self {
        Self::new(0, url)
    }

    /// A link discovered on this page, one hop deeper
    pub fn child(&self, url: Url) -> Self {
        Self::new(self.depth + 1, url)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
