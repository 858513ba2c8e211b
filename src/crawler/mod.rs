//! Crawler module for timed page and asset downloads
//!
//! This module contains the core crawling logic, including:
//! - Timed HTTP fetching with User-Agent rotation
//! - Regex-based asset link extraction
//! - Breadth-first crawl orchestration

mod engine;
pub mod extractor;
mod fetcher;
pub mod user_agent;

pub use engine::CrawlEngine;
pub use extractor::{extract_assets, is_candidate, AssetPatterns, ExtractedAssets};
pub use fetcher::{build_http_client, FetchRecord, FetchTimer, MAX_REDIRECTS};
pub use user_agent::{FixedUserAgent, RandomUserAgent, UserAgentSource, BROWSER_USER_AGENTS};

use crate::config::Config;
use crate::output::TimingReport;
use crate::WebTimerError;

/// Runs a complete measurement of one page
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client and User-Agent pool from the configuration
/// 2. Download the root page and every script, stylesheet and image it links
/// 3. Return the aggregated timings
///
/// # Example
///
/// ```no_run
/// use webtimer::config::Config;
/// use webtimer::crawler::measure;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = measure(&Config::default(), "https://example.com/").await?;
/// println!("Total: {:.2}s", report.total_seconds());
/// # Ok(())
/// # }
/// ```
pub async fn measure(config: &Config, root_url: &str) -> Result<TimingReport, WebTimerError> {
    let mut engine = CrawlEngine::from_config(config)?;
    engine.evaluate(root_url).await
}
