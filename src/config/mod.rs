//! Configuration module for webtimer
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default, so an absent file or an
//! empty one yields a usable [`Config`].
//!
//! # Example
//!
//! ```no_run
//! use webtimer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webtimer.toml")).unwrap();
//! println!("Concurrent fetches: {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ErrorPolicy, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
