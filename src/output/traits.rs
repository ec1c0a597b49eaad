//! Graph sink trait and output errors

use crate::graph::SiteGraph;
use crate::output::CrawlStatistics;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for graph sinks
///
/// A sink receives the finished graph once, after the crawl has stopped,
/// and persists it in its own format.
pub trait GraphSink {
    /// Writes the graph and the run's statistics
    ///
    /// # Arguments
    ///
    /// * `graph` - The final site graph
    /// * `stats` - Totals for the run, stored alongside the graph where the
    ///   format has room for them
    fn write_graph(&self, graph: &SiteGraph, stats: &CrawlStatistics) -> OutputResult<()>;
}
