//! Site graph built during the crawl
//!
//! Nodes are keyed by URL and carry the depth at which the URL was first
//! recorded. Edges are unlabeled (source, target) pairs. Nodes and edges are
//! recorded for every accepted link, including links that are never fetched.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A graph node as exported to sinks
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GraphNode {
    pub url: String,
    pub depth: u32,
}

#[derive(Debug, Default)]
struct GraphInner {
    nodes: BTreeMap<String, u32>,
    edges: BTreeSet<(String, String)>,
}

/// Directed graph of discovered pages, safe to share between workers
///
/// Node depth follows a first-write-wins policy: once a URL is a node its
/// depth never changes, whichever worker records it later.
///
/// # Examples
///
/// ```
/// use link_cartographer::graph::SiteGraph;
///
/// let graph = SiteGraph::new();
/// graph.add_node("https://a.test/", 0);
/// graph.add_node("https://a.test/b", 1);
/// assert!(graph.add_edge("https://a.test/", "https://a.test/b"));
/// assert!(!graph.add_edge("https://a.test/", "https://a.test/b"));
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SiteGraph {
    inner: Mutex<GraphInner>,
}

impl SiteGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GraphInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `url` as a node at `depth`
    ///
    /// Returns true if the node is new. An existing node keeps its depth.
    pub fn add_node(&self, url: &str, depth: u32) -> bool {
        let mut inner = self.lock();
        if inner.nodes.contains_key(url) {
            return false;
        }
        inner.nodes.insert(url.to_string(), depth);
        tracing::debug!("Added to the graph: node {} (depth {})", url, depth);
        true
    }

    /// Records the edge `source -> target`
    ///
    /// Returns true if the edge is new; duplicates collapse to one edge.
    pub fn add_edge(&self, source: &str, target: &str) -> bool {
        let inserted = self
            .lock()
            .edges
            .insert((source.to_string(), target.to_string()));
        if inserted {
            tracing::debug!("Added to the graph: edge {} -> {}", source, target);
        }
        inserted
    }

    /// Depth recorded for `url`, if it is a node
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.lock().nodes.get(url).copied()
    }

    pub fn contains_node(&self, url: &str) -> bool {
        self.lock().nodes.contains_key(url)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.lock()
            .edges
            .contains(&(source.to_string(), target.to_string()))
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.lock().edges.len()
    }

    /// Largest node depth, or None for an empty graph
    pub fn max_depth(&self) -> Option<u32> {
        self.lock().nodes.values().copied().max()
    }

    /// All nodes, sorted by URL
    pub fn nodes(&self) -> Vec<GraphNode> {
        self.lock()
            .nodes
            .iter()
            .map(|(url, depth)| GraphNode {
                url: url.clone(),
                depth: *depth,
            })
            .collect()
    }

    /// All edges, sorted by (source, target)
    pub fn edges(&self) -> Vec<(String, String)> {
        self.lock().edges.iter().cloned().collect()
    }
}
