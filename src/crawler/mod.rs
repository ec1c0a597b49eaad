//! Crawler module for concurrent site mapping
//!
//! This module contains the core crawling logic, including:
//! - The `Link` value passed between workers
//! - The shared work queue and its termination signal
//! - Page fetching and href extraction
//! - The worker pool and crawl orchestration

mod coordinator;
mod fetcher;
mod link;
mod parser;
mod queue;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use link::Link;
pub use parser::extract_hrefs;
pub use queue::WorkQueue;
