//! Crawl statistics
//!
//! Totals gathered by the coordinator during a run, and a printer for the
//! command-line summary.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// The URL the crawl started from
    pub start_url: String,

    /// Pages fetched successfully
    pub pages_fetched: u64,

    /// Fetches that failed or timed out (treated as pages without links)
    pub fetch_failures: u64,

    /// Raw hrefs examined
    pub candidates_seen: u64,

    /// Hrefs that could not be resolved or did not match the URL pattern
    pub candidates_rejected: u64,

    /// Accepted links whose host is not allowed (recorded, not followed)
    pub out_of_scope: u64,

    /// Links claimed and put on the work queue (start URL excluded)
    pub urls_enqueued: u64,

    /// URLs fully processed, start URL included
    pub urls_visited: u64,

    /// Nodes in the final graph
    pub total_nodes: u64,

    /// Edges in the final graph
    pub total_edges: u64,

    /// Largest node depth in the final graph
    pub max_depth_reached: u32,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Percentage of attempted fetches that failed
    pub fn failure_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.fetch_failures;
        if attempted == 0 {
            return 0.0;
        }
        (self.fetch_failures as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Start URL: {}", stats.start_url);
    println!("  Duration: {:.2}s", stats.elapsed.as_secs_f64());
    println!("  Pages visited: {}", stats.urls_visited);
    println!("  Max depth reached: {}", stats.max_depth_reached);
    println!();

    println!("Graph:");
    println!("  Nodes: {}", stats.total_nodes);
    println!("  Edges: {}", stats.total_edges);
    println!();

    println!("Links:");
    println!("  Candidates examined: {}", stats.candidates_seen);
    println!("  Rejected: {}", stats.candidates_rejected);
    println!("  Out of scope: {}", stats.out_of_scope);
    println!("  Enqueued: {}", stats.urls_enqueued);
    println!();

    println!(
        "Fetch Failures: {:.1}% ({} of {} fetches)",
        stats.failure_rate(),
        stats.fetch_failures,
        stats.pages_fetched + stats.fetch_failures
    );
}
