//! Output module for persisting the finished site graph
//!
//! This module handles:
//! - Writing the graph as a GEXF file for graph tools
//! - Storing the graph in a SQLite database
//! - Reporting crawl statistics

mod gexf;
mod sqlite_output;
pub mod stats;
mod traits;

pub use gexf::{format_gexf, GexfWriter};
pub use sqlite_output::SqliteGraphWriter;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{GraphSink, OutputError, OutputResult};

use crate::config::{OutputConfig, OutputFormat};

/// Creates the sink selected by the output configuration
///
/// # Arguments
///
/// * `config` - Output section of the configuration
///
/// # Returns
///
/// A sink that writes to `config.graph_path` in `config.format`
pub fn sink_for(config: &OutputConfig) -> Box<dyn GraphSink> {
    match config.format {
        OutputFormat::Gexf => Box::new(GexfWriter::new(&config.graph_path)),
        OutputFormat::Sqlite => Box::new(SqliteGraphWriter::new(&config.graph_path)),
    }
}
