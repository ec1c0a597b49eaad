//! Link-Cartographer: a concurrent site-map crawler
//!
//! This crate crawls a website from a start URL with a pool of concurrent
//! workers, follows in-scope links up to a bounded depth, and records every
//! discovered (page → linked page) relationship in a directed graph.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Cartographer operations
#[derive(Debug, Error)]
pub enum CartographerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid worker state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WorkerState,
        to: state::WorkerState,
    },

    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(String),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CartographerError {
    /// Returns true if this error must abort the crawl
    ///
    /// Per-URL failures (fetching, URL resolution) are absorbed by the
    /// workers; only broken internal contracts and failures to acquire
    /// resources stop a run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolation(_)
                | Self::InvalidTransition { .. }
                | Self::ResourceExhaustion(_)
                | Self::Worker(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid URL regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Page fetch errors
///
/// None of these abort a crawl: the worker logs them and treats the page as
/// having no outbound links.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, Fetcher, HttpFetcher, Link};
pub use graph::SiteGraph;
pub use state::{FrontierTracker, WorkerState};
pub use url::{extract_domain, FilterPolicy};
