use serde::Deserialize;
use url::Url;

/// Main configuration structure for Link-Cartographer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from (depth 0)
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Domains whose pages are followed; empty means the start URL's host
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Regex every discovered URL must match from its first character
    #[serde(rename = "url-pattern")]
    pub url_pattern: String,

    /// Maximum hop distance from the start URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of concurrent workers
    pub parallelism: u32,

    /// Ceiling for a single page fetch (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.google.com".to_string(),
            allowed_domains: Vec::new(),
            url_pattern: DEFAULT_URL_PATTERN.to_string(),
            max_depth: 2,
            parallelism: 10,
            fetch_timeout_ms: 2000,
        }
    }
}

impl CrawlerConfig {
    /// Returns the allowed domain patterns for this crawl
    ///
    /// Falls back to the start URL's host when no domains are configured.
    /// An unparseable start URL yields an empty list; validation rejects
    /// that case before a crawl is started.
    pub fn effective_allowed_domains(&self) -> Vec<String> {
        if !self.allowed_domains.is_empty() {
            return self
                .allowed_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect();
        }

        Url::parse(&self.start_url)
            .ok()
            .and_then(|url| crate::url::extract_domain(&url))
            .into_iter()
            .collect()
    }
}

/// Accepts only http and https URLs
pub const DEFAULT_URL_PATTERN: &str = "(http://.*|https://.*)";

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version`, followed by `(+ContactURL; ContactEmail)` when either
    /// contact field is set.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            base
        } else {
            format!("{} ({})", base, contact.join("; "))
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path the final graph is written to
    #[serde(rename = "graph-path")]
    pub graph_path: String,

    /// Serialization format of the graph file
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph_path: "graph.gexf".to_string(),
            format: OutputFormat::Gexf,
        }
    }
}

/// Supported graph file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// GEXF 1.2 XML (readable by Gephi and networkx)
    #[default]
    Gexf,
    /// SQLite database with node and edge tables
    Sqlite,
}
