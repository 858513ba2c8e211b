//! webtimer: per-resource download timing for a webpage
//!
//! This crate fetches a page, discovers the scripts, stylesheets and images it
//! links to, fetches each of them once, and reports how long every download
//! took, both per URL and per asset class.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for webtimer operations
#[derive(Debug, Error)]
pub enum WebTimerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Measurement aborted: {source}")]
    Aborted {
        source: FetchError,
        /// Timings booked before the failed download
        report: Box<output::TimingReport>,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Root URL has no domain: {0}")]
    MissingDomain(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::EngineState,
        to: state::EngineState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WebTimerError {
    /// The partial report of an aborted crawl
    pub fn partial_report(&self) -> Option<&output::TimingReport> {
        match self {
            Self::Aborted { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure of a single timed download
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// The URL whose download failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Request { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Result type alias for webtimer operations
pub type Result<T> = std::result::Result<T, WebTimerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, FetchRecord, FetchTimer};
pub use output::TimingReport;
pub use state::{AssetType, EngineState, WorkItem};
pub use crate::url::{extract_domain, resolve};
