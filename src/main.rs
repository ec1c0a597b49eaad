//! Link-Cartographer main entry point
//!
//! This is the command-line interface for the Link-Cartographer site mapper.

use anyhow::Context;
use clap::Parser;
use link_cartographer::config::{load_config_with_hash, validate, Config, OutputFormat};
use link_cartographer::crawler::run_crawl;
use link_cartographer::output::{print_statistics, sink_for};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link-Cartographer: a concurrent site mapper
///
/// Link-Cartographer crawls a website up to a maximum depth, following only
/// links inside the allowed domains, and writes the link structure it found
/// as a directed graph.
#[derive(Parser, Debug)]
#[command(name = "link-cartographer")]
#[command(version)]
#[command(about = "A concurrent site mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL the crawl starts from
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Regular expression a link must match from its first character
    #[arg(long, value_name = "RE")]
    url_regex: Option<String>,

    /// Domain whose pages are followed (repeatable, `*.` wildcards allowed)
    #[arg(long = "allowed-domain", value_name = "DOMAIN")]
    allowed_domains: Vec<String>,

    /// Maximum link depth to fetch
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Number of concurrent workers
    #[arg(long, value_name = "N")]
    parallelism: Option<u32>,

    /// Path the graph is written to
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Graph file format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_cartographer=info,warn"),
            1 => EnvFilter::new("link_cartographer=debug,info"),
            2 => EnvFilter::new("link_cartographer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags over the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(url_regex) = &cli.url_regex {
        config.crawler.url_pattern = url_regex.clone();
    }
    if !cli.allowed_domains.is_empty() {
        config.crawler.allowed_domains = cli.allowed_domains.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(parallelism) = cli.parallelism {
        config.crawler.parallelism = parallelism;
    }
    if let Some(output) = &cli.output {
        config.output.graph_path = output.to_string_lossy().into_owned();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Link-Cartographer Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  URL pattern: {}", config.crawler.url_pattern);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Parallelism: {}", config.crawler.parallelism);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);

    let domains = config.crawler.effective_allowed_domains();
    println!("\nAllowed Domains ({}):", domains.len());
    for domain in &domains {
        println!("  - {}", domain);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Graph: {}", config.output.graph_path);
    println!("  Format: {:?}", config.output.format);

    println!("\n✓ Configuration is valid");
}

/// Handles the normal crawl mode
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let report = run_crawl(config).await.context("crawl failed")?;

    sink_for(&config.output)
        .write_graph(&report.graph, &report.statistics)
        .with_context(|| format!("failed to write {}", config.output.graph_path))?;

    println!();
    print_statistics(&report.statistics);

    Ok(())
}
