//! GEXF graph output
//!
//! Writes the site graph as a GEXF 1.2 directed graph, readable by Gephi and
//! by networkx's `read_gexf`. Each node's id and label are its URL, and its
//! crawl depth is stored as the integer node attribute `depth`.

use crate::graph::SiteGraph;
use crate::output::traits::{GraphSink, OutputResult};
use crate::output::CrawlStatistics;
use chrono::{NaiveDate, Utc};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes graphs to a GEXF file
#[derive(Debug, Clone)]
pub struct GexfWriter {
    path: PathBuf,
}

impl GexfWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSink for GexfWriter {
    fn write_graph(&self, graph: &SiteGraph, stats: &CrawlStatistics) -> OutputResult<()> {
        let document = format_gexf(graph, stats, Utc::now().date_naive());

        let mut file = File::create(&self.path)?;
        file.write_all(document.as_bytes())?;

        tracing::info!(
            "Site map saved as a directed graph to: {}",
            self.path.display()
        );
        Ok(())
    }
}

/// Formats a graph as a GEXF document
///
/// # Arguments
///
/// * `graph` - The site graph
/// * `stats` - Run statistics; the start URL goes into the description
/// * `date` - Value of the `lastmodifieddate` meta attribute
pub fn format_gexf(graph: &SiteGraph, stats: &CrawlStatistics, date: NaiveDate) -> String {
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<gexf xmlns=\"http://www.gexf.net/1.2draft\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://www.gexf.net/1.2draft http://www.gexf.net/1.2draft/gexf.xsd\" \
         version=\"1.2\">\n",
    );

    xml.push_str(&format!(
        "  <meta lastmodifieddate=\"{}\">\n",
        date.format("%Y-%m-%d")
    ));
    xml.push_str(&format!(
        "    <creator>{} {}</creator>\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    xml.push_str(&format!(
        "    <description>Site map of {}</description>\n",
        escape_xml(&stats.start_url)
    ));
    xml.push_str("  </meta>\n");

    xml.push_str("  <graph defaultedgetype=\"directed\" mode=\"static\">\n");
    xml.push_str("    <attributes class=\"node\" mode=\"static\">\n");
    xml.push_str("      <attribute id=\"0\" title=\"depth\" type=\"long\" />\n");
    xml.push_str("    </attributes>\n");

    xml.push_str("    <nodes>\n");
    for node in graph.nodes() {
        let url = escape_xml(&node.url);
        xml.push_str(&format!("      <node id=\"{}\" label=\"{}\">\n", url, url));
        xml.push_str("        <attvalues>\n");
        xml.push_str(&format!(
            "          <attvalue for=\"0\" value=\"{}\" />\n",
            node.depth
        ));
        xml.push_str("        </attvalues>\n");
        xml.push_str("      </node>\n");
    }
    xml.push_str("    </nodes>\n");

    xml.push_str("    <edges>\n");
    for (id, (source, target)) in graph.edges().iter().enumerate() {
        xml.push_str(&format!(
            "      <edge id=\"{}\" source=\"{}\" target=\"{}\" />\n",
            id,
            escape_xml(source),
            escape_xml(target)
        ));
    }
    xml.push_str("    </edges>\n");

    xml.push_str("  </graph>\n");
    xml.push_str("</gexf>\n");

    xml
}

/// Escapes the five XML special characters for use in attributes and text
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
