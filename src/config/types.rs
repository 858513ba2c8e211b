use serde::Deserialize;

/// Main configuration structure for webtimer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// What the crawl does when a single download fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure, leave the URL out of the timings and keep going
    #[default]
    Skip,
    /// Stop the whole crawl on the first failed download
    Abort,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of downloads that may be in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Whole-request timeout for a single download (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout for a single download (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Upper bound on the number of downloads in one crawl
    #[serde(rename = "max-resources", default)]
    pub max_resources: Option<usize>,

    /// Failure handling for individual downloads
    #[serde(rename = "on-error", default)]
    pub on_error: ErrorPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_resources: None,
            on_error: ErrorPolicy::default(),
        }
    }
}

/// User-Agent rotation configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAgentConfig {
    /// Browser User-Agent strings to rotate through; empty means the built-in pool
    #[serde(default)]
    pub pool: Vec<String>,
}

fn default_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
