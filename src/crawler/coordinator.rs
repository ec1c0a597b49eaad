//! Crawler coordinator - worker pool and crawl orchestration
//!
//! The coordinator seeds the work queue with the start URL, runs a fixed pool
//! of workers that drain it, waits until the queue reports no outstanding
//! work, then cancels the workers. Each worker:
//! - Records the dequeued link as a graph node
//! - Fetches it if it is above the depth limit
//! - Resolves and filters the discovered hrefs
//! - Records accepted links and enqueues the in-scope ones it manages to claim
//! - Marks the dequeued link visited and done

use crate::config::{Config, CrawlerConfig};
use crate::crawler::{Fetcher, HttpFetcher, Link, WorkQueue};
use crate::graph::SiteGraph;
use crate::output::CrawlStatistics;
use crate::state::{FrontierTracker, WorkerState};
use crate::url::FilterPolicy;
use crate::{CartographerError, ConfigError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Per-crawl counters updated by all workers
#[derive(Debug, Default)]
struct CrawlCounters {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    candidates_seen: AtomicU64,
    candidates_rejected: AtomicU64,
    out_of_scope: AtomicU64,
    urls_enqueued: AtomicU64,
}

impl CrawlCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// State shared by the coordinator and every worker
struct CrawlContext {
    queue: WorkQueue,
    frontier: Arc<FrontierTracker>,
    graph: Arc<SiteGraph>,
    policy: FilterPolicy,
    fetcher: Arc<dyn Fetcher>,
    max_depth: u32,
    fetch_timeout: Duration,
    counters: CrawlCounters,
}

/// Result of a finished crawl
pub struct CrawlReport {
    /// Every accepted URL and link discovered during the crawl
    pub graph: Arc<SiteGraph>,

    /// Final frontier; every claimed URL is visited once the crawl completes
    pub frontier: Arc<FrontierTracker>,

    /// Counters and totals for the run
    pub statistics: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    start_url: Url,
    frontier: Arc<FrontierTracker>,
    policy: FilterPolicy,
    fetcher: Arc<dyn Fetcher>,
    max_depth: u32,
    parallelism: usize,
    fetch_timeout: Duration,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - The page fetcher every worker shares
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CartographerError)` - The start URL, pattern or pool size is invalid
    pub fn new(config: &CrawlerConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, CartographerError> {
        let mut start_url = Url::parse(&config.start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", config.start_url, e))
        })?;
        // Discovered links are resolved without fragments; the start URL must
        // be keyed the same way or its page is claimed twice.
        start_url.set_fragment(None);

        if config.parallelism == 0 {
            return Err(ConfigError::Validation("parallelism must be at least 1".to_string()).into());
        }

        Ok(Self {
            start_url,
            frontier: Arc::new(FrontierTracker::new()),
            policy: FilterPolicy::from_config(config)?,
            fetcher,
            max_depth: config.max_depth,
            parallelism: config.parallelism as usize,
            fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
        })
    }

    /// The start URL as it will be claimed
    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Shared handle to the frontier this coordinator's workers update
    pub fn frontier(&self) -> Arc<FrontierTracker> {
        Arc::clone(&self.frontier)
    }

    /// Runs the crawl to completion
    ///
    /// Returns once every claimed URL has been processed and all workers
    /// have stopped. Per-page failures never surface here; an error means an
    /// internal invariant broke or a worker task died.
    pub async fn run(self) -> Result<CrawlReport, CartographerError> {
        let started = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            self.start_url,
            self.max_depth,
            self.parallelism
        );

        let ctx = Arc::new(CrawlContext {
            queue: WorkQueue::new(),
            frontier: self.frontier,
            graph: Arc::new(SiteGraph::new()),
            policy: self.policy,
            fetcher: self.fetcher,
            max_depth: self.max_depth,
            fetch_timeout: self.fetch_timeout,
            counters: CrawlCounters::default(),
        });

        let cancel = CancellationToken::new();
        let mut workers = JoinSet::new();
        for id in 0..self.parallelism {
            let worker = Worker::new(id, Arc::clone(&ctx));
            workers.spawn(worker.run(cancel.clone()));
        }

        // The frontier is empty, so the start URL is always claimed. It
        // bypasses pattern and scope checks.
        let root = Link::root(self.start_url.clone());
        ctx.frontier.try_claim(root.as_str());
        ctx.queue.produce(root)?;

        let early_exit = tokio::select! {
            _ = ctx.queue.join() => None,
            Some(result) = workers.join_next() => Some(result),
        };

        cancel.cancel();

        if let Some(result) = early_exit {
            result??;
            return Err(CartographerError::InvariantViolation(
                "worker stopped before the crawl finished".to_string(),
            ));
        }

        while let Some(result) = workers.join_next().await {
            result??;
        }
        ctx.frontier.check_disjoint()?;

        let counters = &ctx.counters;
        let statistics = CrawlStatistics {
            start_url: self.start_url.to_string(),
            pages_fetched: counters.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: counters.fetch_failures.load(Ordering::Relaxed),
            candidates_seen: counters.candidates_seen.load(Ordering::Relaxed),
            candidates_rejected: counters.candidates_rejected.load(Ordering::Relaxed),
            out_of_scope: counters.out_of_scope.load(Ordering::Relaxed),
            urls_enqueued: counters.urls_enqueued.load(Ordering::Relaxed),
            urls_visited: ctx.frontier.visited_count() as u64,
            total_nodes: ctx.graph.node_count() as u64,
            total_edges: ctx.graph.edge_count() as u64,
            max_depth_reached: ctx.graph.max_depth().unwrap_or(0),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} pages visited, {} nodes, {} edges in {:?}",
            statistics.urls_visited,
            statistics.total_nodes,
            statistics.total_edges,
            statistics.elapsed
        );

        Ok(CrawlReport {
            graph: Arc::clone(&ctx.graph),
            frontier: Arc::clone(&ctx.frontier),
            statistics,
        })
    }
}

/// One member of the worker pool
struct Worker {
    id: usize,
    ctx: Arc<CrawlContext>,
    state: WorkerState,
}

impl Worker {
    fn new(id: usize, ctx: Arc<CrawlContext>) -> Self {
        Self {
            id,
            ctx,
            state: WorkerState::Idle,
        }
    }

    fn transition(&mut self, next: WorkerState) -> Result<(), CartographerError> {
        if !self.state.can_transition_to(next) {
            return Err(CartographerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Worker {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Processes links until cancelled
    ///
    /// Cancellation is only observed while waiting for the next link; an
    /// item already taken is always finished.
    async fn run(mut self, cancel: CancellationToken) -> Result<(), CartographerError> {
        loop {
            let link = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Worker {}: cancelled", self.id);
                    return Ok(());
                }
                link = self.ctx.queue.consume() => link?,
            };

            self.process(&link).await?;
            self.transition(WorkerState::Idle)?;
        }
    }

    async fn process(&mut self, link: &Link) -> Result<(), CartographerError> {
        tracing::info!("Worker {}: start crawling {}", self.id, link);

        self.ctx.graph.add_node(link.as_str(), link.depth());

        if link.depth() < self.ctx.max_depth {
            self.transition(WorkerState::Fetching)?;
            let hrefs = self.fetch(link).await;
            self.handle_candidates(link, hrefs)?;
        }

        self.transition(WorkerState::DoneWithItem)?;
        self.ctx.frontier.mark_visited(link.as_str())?;
        self.ctx.queue.mark_done()?;

        tracing::info!("Worker {}: end crawling {}", self.id, link);
        Ok(())
    }

    /// Fetches the page, degrading any failure to an empty link list
    async fn fetch(&self, link: &Link) -> Vec<String> {
        let counters = &self.ctx.counters;
        match tokio::time::timeout(self.ctx.fetch_timeout, self.ctx.fetcher.fetch(link.url())).await
        {
            Ok(Ok(hrefs)) => {
                CrawlCounters::bump(&counters.pages_fetched);
                hrefs
            }
            Ok(Err(e)) => {
                tracing::warn!("Worker {}: {}", self.id, e);
                CrawlCounters::bump(&counters.fetch_failures);
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    "Worker {}: fetch of {} exceeded {:?}",
                    self.id,
                    link,
                    self.ctx.fetch_timeout
                );
                CrawlCounters::bump(&counters.fetch_failures);
                Vec::new()
            }
        }
    }

    fn handle_candidates(&mut self, link: &Link, hrefs: Vec<String>) -> Result<(), CartographerError> {
        let ctx = Arc::clone(&self.ctx);
        let counters = &ctx.counters;

        for href in hrefs {
            self.transition(WorkerState::Filtering)?;
            CrawlCounters::bump(&counters.candidates_seen);

            let url = match ctx.policy.resolve(&href, link.url()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Worker {}: rejected {:?} on {}: {}", self.id, href, link, e);
                    CrawlCounters::bump(&counters.candidates_rejected);
                    continue;
                }
            };

            if !ctx.policy.accept(url.as_str()) {
                CrawlCounters::bump(&counters.candidates_rejected);
                continue;
            }

            let child = link.child(url);
            ctx.graph.add_node(child.as_str(), child.depth());
            ctx.graph.add_edge(link.as_str(), child.as_str());

            if !ctx.policy.is_in_scope(child.as_str()) {
                CrawlCounters::bump(&counters.out_of_scope);
                continue;
            }

            if ctx.frontier.try_claim(child.as_str()) {
                self.transition(WorkerState::Enqueuing)?;
                ctx.queue.produce(child)?;
                CrawlCounters::bump(&counters.urls_enqueued);
            }
        }

        Ok(())
    }
}

/// Runs a crawl over HTTP as described by the configuration
///
/// This function:
/// 1. Builds the HTTP client (fails with `ResourceExhaustion` if it cannot)
/// 2. Creates the coordinator and its worker pool
/// 3. Crawls until no work is outstanding
///
/// # Example
///
/// ```no_run
/// use link_cartographer::config::load_config;
/// use link_cartographer::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} nodes", report.graph.node_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, CartographerError> {
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
    let coordinator = Coordinator::new(&config.crawler, Arc::new(fetcher))?;
    coordinator.run().await
}
