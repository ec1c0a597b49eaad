//! SQLite graph output
//!
//! Stores each finished crawl as one row in `crawl_runs` with its nodes and
//! edges keyed by run, so repeated crawls can share a database file.

use crate::graph::SiteGraph;
use crate::output::traits::{GraphSink, OutputResult};
use crate::output::CrawlStatistics;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL schema for the graph database
pub const SCHEMA_SQL: &str = r#"
-- One row per finished crawl
CREATE TABLE IF NOT EXISTS crawl_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_url TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    duration_ms INTEGER NOT NULL,
    pages_visited INTEGER NOT NULL,
    fetch_failures INTEGER NOT NULL
);

-- Every recorded URL with the depth it was first seen at
CREATE TABLE IF NOT EXISTS nodes (
    run_id INTEGER NOT NULL REFERENCES crawl_runs(id),
    url TEXT NOT NULL,
    depth INTEGER NOT NULL,
    UNIQUE(run_id, url)
);

-- Link relationships
CREATE TABLE IF NOT EXISTS edges (
    run_id INTEGER NOT NULL REFERENCES crawl_runs(id),
    source TEXT NOT NULL,
    target TEXT NOT NULL,
    UNIQUE(run_id, source, target)
);

CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(run_id, source);
CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(run_id, target);
"#;

/// Writes graphs into a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteGraphWriter {
    path: PathBuf,
}

impl SqliteGraphWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one run into an open connection and returns its run id
    ///
    /// Everything is inserted in a single transaction.
    pub fn write_to_connection(
        conn: &mut Connection,
        graph: &SiteGraph,
        stats: &CrawlStatistics,
    ) -> OutputResult<i64> {
        conn.execute_batch(SCHEMA_SQL)?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO crawl_runs (start_url, finished_at, duration_ms, pages_visited, fetch_failures)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                stats.start_url,
                Utc::now().to_rfc3339(),
                stats.elapsed.as_millis() as i64,
                stats.urls_visited as i64,
                stats.fetch_failures as i64,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut insert_node =
                tx.prepare("INSERT INTO nodes (run_id, url, depth) VALUES (?1, ?2, ?3)")?;
            for node in graph.nodes() {
                insert_node.execute(params![run_id, node.url, node.depth])?;
            }

            let mut insert_edge =
                tx.prepare("INSERT INTO edges (run_id, source, target) VALUES (?1, ?2, ?3)")?;
            for (source, target) in graph.edges() {
                insert_edge.execute(params![run_id, source, target])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }
}

impl GraphSink for SqliteGraphWriter {
    fn write_graph(&self, graph: &SiteGraph, stats: &CrawlStatistics) -> OutputResult<()> {
        let mut conn = Connection::open(&self.path)?;
        let run_id = Self::write_to_connection(&mut conn, graph, stats)?;

        tracing::info!(
            "Site map saved as run {} to database: {}",
            run_id,
            self.path.display()
        );
        Ok(())
    }
}
