//! Integration tests for the crawler
//!
//! The scripted fetcher serves canned hrefs from memory and records every
//! URL it is asked for. The wiremock tests run the full HTTP stack end to end.

use async_trait::async_trait;
use link_cartographer::config::{Config, CrawlerConfig, OutputConfig, OutputFormat};
use link_cartographer::crawler::{run_crawl, Coordinator, CrawlReport, Fetcher};
use link_cartographer::output::{sink_for, GexfWriter, GraphSink};
use link_cartographer::{FetchError, FrontierTracker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory fetcher that records the URLs it was asked for
#[derive(Default)]
struct ScriptedFetcher {
    pages: HashMap<String, Vec<String>>,
    failing: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn new(pages: &[(&str, &[&str])]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, hrefs)| {
                    (url.to_string(), hrefs.iter().map(|h| h.to_string()).collect())
                })
                .collect(),
            ..Self::default()
        }
    }

    fn failing_on(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort();
        requests
    }

    fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<String>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.failing.iter().any(|u| u == url.as_str()) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        Ok(self.pages.get(url.as_str()).cloned().unwrap_or_default())
    }
}

fn crawler_config(start: &str, max_depth: u32, parallelism: u32) -> CrawlerConfig {
    CrawlerConfig {
        start_url: start.to_string(),
        max_depth,
        parallelism,
        ..CrawlerConfig::default()
    }
}

async fn crawl(config: &CrawlerConfig, fetcher: Arc<ScriptedFetcher>) -> CrawlReport {
    Coordinator::new(config, fetcher)
        .expect("valid configuration")
        .run()
        .await
        .expect("crawl completes")
}

fn node_urls(report: &CrawlReport) -> Vec<String> {
    report.graph.nodes().into_iter().map(|n| n.url).collect()
}

/// Checks properties that hold for every finished crawl
fn assert_crawl_invariants(report: &CrawlReport, max_depth: u32) {
    assert_eq!(report.frontier.pending_count(), 0);
    report.frontier.check_disjoint().unwrap();

    // Every node other than the start was discovered on a visited page
    let visited = report.frontier.visited_urls();
    let edges = report.graph.edges();
    for node in report.graph.nodes() {
        if node.url == report.statistics.start_url {
            continue;
        }
        assert!(
            edges
                .iter()
                .any(|(source, target)| *target == node.url && visited.contains(source)),
            "{} has no incoming edge from a visited page",
            node.url
        );
    }

    for node in report.graph.nodes() {
        assert!(
            node.depth <= max_depth,
            "{} recorded at depth {}",
            node.url,
            node.depth
        );
    }
    for (source, target) in report.graph.edges() {
        assert!(report.graph.contains_node(&source));
        assert!(report.graph.contains_node(&target));
    }
}

#[tokio::test]
async fn test_single_level_crawl() {
    let fetcher = Arc::new(ScriptedFetcher::new(&[(
        "https://a.test/",
        &["/b", "https://a.test/c", "https://other.test/x"],
    )]));
    let mut config = crawler_config("https://a.test/", 1, 4);
    config.allowed_domains = vec!["a.test".to_string()];

    let report = crawl(&config, Arc::clone(&fetcher)).await;

    assert_eq!(
        node_urls(&report),
        vec![
            "https://a.test/",
            "https://a.test/b",
            "https://a.test/c",
            "https://other.test/x",
        ]
    );
    assert_eq!(report.graph.edge_count(), 3);
    for target in ["https://a.test/b", "https://a.test/c", "https://other.test/x"] {
        assert!(report.graph.contains_edge("https://a.test/", target));
        assert_eq!(report.graph.depth_of(target), Some(1));
    }

    // Only the start page is above the depth limit
    assert_eq!(fetcher.requests(), vec!["https://a.test/"]);
    assert!(!report.frontier.is_visited("https://other.test/x"));
    assert!(report.frontier.is_visited("https://a.test/b"));

    assert_eq!(report.statistics.out_of_scope, 1);
    assert_eq!(report.statistics.urls_enqueued, 2);
    assert_eq!(report.statistics.urls_visited, 3);
    assert_crawl_invariants(&report, 1);
}

#[tokio::test]
async fn test_zero_depth_records_only_start() {
    let fetcher = Arc::new(ScriptedFetcher::new(&[(
        "https://a.test/",
        &["/b", "/c"],
    )]));
    let config = crawler_config("https://a.test/", 0, 2);

    let report = crawl(&config, Arc::clone(&fetcher)).await;

    assert_eq!(node_urls(&report), vec!["https://a.test/"]);
    assert_eq!(report.graph.edge_count(), 0);
    assert!(fetcher.requests().is_empty());
    assert_eq!(report.statistics.urls_visited, 1);
    assert_crawl_invariants(&report, 0);
}

#[tokio::test]
async fn test_shared_child_fetched_once() {
    let fetcher = Arc::new(ScriptedFetcher::new(&[
        ("https://a.test/", &["/p1", "/p2"]),
        ("https://a.test/p1", &["/shared"]),
        ("https://a.test/p2", &["/shared"]),
        ("https://a.test/shared", &["/leaf"]),
    ]));
    let config = crawler_config("https://a.test/", 3, 8);

    let report = crawl(&config, Arc::clone(&fetcher)).await;

    assert!(report
        .graph
        .contains_edge("https://a.test/p1", "https://a.test/shared"));
    assert!(report
        .graph
        .contains_edge("https://a.test/p2", "https://a.test/shared"));
    assert_eq!(report.graph.depth_of("https://a.test/shared"), Some(2));
    assert_eq!(fetcher.request_count("https://a.test/shared"), 1);
    assert_eq!(report.graph.depth_of("https://a.test/leaf"), Some(3));
    assert_eq!(report.graph.node_count(), 5);
    assert_crawl_invariants(&report, 3);
}

#[tokio::test]
async fn test_fetch_failure_is_absorbed() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(&[
            ("https://a.test/", &["/broken", "/ok"]),
            ("https://a.test/broken", &["/never"]),
            ("https://a.test/ok", &["/after"]),
        ])
        .failing_on("https://a.test/broken"),
    );
    let config = crawler_config("https://a.test/", 2, 3);

    let report = crawl(&config, Arc::clone(&fetcher)).await;

    assert!(report.frontier.is_visited("https://a.test/broken"));
    assert!(report.graph.contains_node("https://a.test/broken"));
    assert!(!report.graph.contains_node("https://a.test/never"));
    assert!(report.graph.contains_node("https://a.test/after"));
    assert_eq!(report.statistics.fetch_failures, 1);
    assert_crawl_invariants(&report, 2);
}

#[tokio::test]
async fn test_single_worker_is_deterministic() {
    let pages: &[(&str, &[&str])] = &[
        ("https://a.test/", &["/x", "/y", "/z"]),
        ("https://a.test/x", &["/y", "/x/1"]),
        ("https://a.test/y", &["/", "/y/1"]),
        ("https://a.test/z", &["/x/1", "https://other.test/"]),
    ];
    let config = crawler_config("https://a.test/", 2, 1);

    let first = crawl(&config, Arc::new(ScriptedFetcher::new(pages))).await;
    let second = crawl(&config, Arc::new(ScriptedFetcher::new(pages))).await;

    assert_eq!(first.frontier.visited_urls(), second.frontier.visited_urls());
    assert_eq!(first.graph.nodes(), second.graph.nodes());
    assert_eq!(first.graph.edges(), second.graph.edges());
    assert_crawl_invariants(&first, 2);
}

#[tokio::test]
async fn test_url_pattern_filters_candidates() {
    let fetcher = Arc::new(ScriptedFetcher::new(&[(
        "https://a.test/",
        &["/docs/intro", "/blog/post", "mailto:someone@a.test"],
    )]));
    let mut config = crawler_config("https://a.test/", 2, 2);
    config.url_pattern = "https://a\\.test/docs/.*".to_string();

    let report = crawl(&config, Arc::clone(&fetcher)).await;

    assert!(report.graph.contains_node("https://a.test/docs/intro"));
    assert!(!report.graph.contains_node("https://a.test/blog/post"));
    assert_eq!(report.statistics.candidates_seen, 3);
    assert_eq!(report.statistics.candidates_rejected, 2);
    assert_crawl_invariants(&report, 2);
}

/// Fetcher that inspects the coordinator's frontier while the crawl runs
struct FrontierObserver {
    pages: HashMap<String, Vec<String>>,
    frontier: OnceLock<Arc<FrontierTracker>>,
    problems: Mutex<Vec<String>>,
    observations: Mutex<usize>,
}

#[async_trait]
impl Fetcher for FrontierObserver {
    async fn fetch(&self, url: &Url) -> Result<Vec<String>, FetchError> {
        if let Some(frontier) = self.frontier.get() {
            let mut problems = self.problems.lock().unwrap();
            if let Err(e) = frontier.check_disjoint() {
                problems.push(e.to_string());
            }
            // Only this worker can finish the URL it is fetching
            if !frontier.is_pending(url.as_str()) || frontier.is_visited(url.as_str()) {
                problems.push(format!("{} fetched while not pending", url));
            }
            *self.observations.lock().unwrap() += 1;
        }

        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(self.pages.get(url.as_str()).cloned().unwrap_or_default())
    }
}

#[tokio::test]
async fn test_frontier_sets_disjoint_during_crawl() {
    let mut pages: HashMap<String, Vec<String>> = HashMap::new();
    pages.insert(
        "https://a.test/".to_string(),
        (0..6).map(|i| format!("/s{}", i)).collect(),
    );
    for i in 0..6 {
        pages.insert(
            format!("https://a.test/s{}", i),
            vec![
                "/".to_string(),
                format!("/s{}", (i + 1) % 6),
                format!("/s{}/leaf", i),
                "/shared".to_string(),
            ],
        );
    }
    pages.insert(
        "https://a.test/shared".to_string(),
        vec!["/s0".to_string(), "/deep".to_string()],
    );

    let fetcher = Arc::new(FrontierObserver {
        pages,
        frontier: OnceLock::new(),
        problems: Mutex::new(Vec::new()),
        observations: Mutex::new(0),
    });
    let config = crawler_config("https://a.test/", 3, 4);
    let coordinator = Coordinator::new(&config, Arc::clone(&fetcher) as Arc<dyn Fetcher>)
        .expect("valid configuration");
    assert!(fetcher.frontier.set(coordinator.frontier()).is_ok());

    let report = coordinator.run().await.expect("crawl completes");

    assert!(
        fetcher.problems.lock().unwrap().is_empty(),
        "{:?}",
        fetcher.problems.lock().unwrap()
    );
    // Start, six section pages, their leaves and the shared page are fetched
    assert_eq!(*fetcher.observations.lock().unwrap(), 14);
    assert_crawl_invariants(&report, 3);
}

fn html_page(links: &[String]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>\n", href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_http_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[
            "/page1".to_string(),
            format!("{}/page2", base),
            "https://elsewhere.test/".to_string(),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(&["/page3".to_string(), "/".to_string()]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let graph_path = dir.path().join("graph.gexf");
    let mut config = Config::default();
    config.crawler = crawler_config(&format!("{}/", base), 2, 4);
    config.output = OutputConfig {
        graph_path: graph_path.to_string_lossy().into_owned(),
        format: OutputFormat::Gexf,
    };

    let report = run_crawl(&config).await.unwrap();

    let root = format!("{}/", base);
    let page1 = format!("{}/page1", base);
    let page3 = format!("{}/page3", base);
    assert!(report.graph.contains_edge(&root, &page1));
    assert!(report.graph.contains_edge(&page1, &page3));
    assert!(report.graph.contains_edge(&page1, &root));
    assert!(report.graph.contains_node("https://elsewhere.test/"));
    assert_eq!(report.graph.depth_of(&page3), Some(2));
    assert_eq!(report.statistics.fetch_failures, 1);
    assert_crawl_invariants(&report, 2);

    sink_for(&config.output)
        .write_graph(&report.graph, &report.statistics)
        .unwrap();
    let xml = std::fs::read_to_string(&graph_path).unwrap();
    assert!(xml.contains(&format!("<node id=\"{}\"", page3)));
    assert_eq!(xml.matches("<edge ").count(), report.graph.edge_count());
}

#[tokio::test]
async fn test_unreachable_start_url() {
    let server = MockServer::start().await;
    let start = format!("{}/", server.uri());
    drop(server);

    let mut config = Config::default();
    config.crawler = crawler_config(&start, 2, 2);
    config.crawler.fetch_timeout_ms = 500;

    let report = run_crawl(&config).await.unwrap();

    assert_eq!(report.graph.node_count(), 1);
    assert!(report.frontier.is_visited(&start));
    assert_eq!(report.statistics.fetch_failures, 1);

    let dir = tempfile::tempdir().unwrap();
    let writer = GexfWriter::new(dir.path().join("empty.gexf"));
    writer
        .write_graph(&report.graph, &report.statistics)
        .unwrap();
}
