//! Configuration module for Link-Cartographer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; the binary layers command-line overrides on top and
//! validates the result before crawling.
//!
//! # Example
//!
//! ```no_run
//! use link_cartographer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, UserAgentConfig, DEFAULT_URL_PATTERN,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
