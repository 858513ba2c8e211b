//! User-Agent sources for outgoing requests
//!
//! Downloads are made with ordinary browser User-Agent strings so that servers
//! serve the same content, at the same speed, as they would to a visitor. The
//! source is injected into the fetcher, which lets tests pin a fixed value.

use crate::config::UserAgentConfig;

/// Real-world browser identifiers used when no pool is configured
pub const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.67",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.82 Mobile Safari/537.36",
];

/// Supplies the User-Agent header for each request
pub trait UserAgentSource: Send + Sync {
    /// Returns the value to send with the next request
    fn next_user_agent(&self) -> String;
}

/// Picks a uniformly random entry from a pool on every request
#[derive(Debug, Clone)]
pub struct RandomUserAgent {
    pool: Vec<String>,
}

impl RandomUserAgent {
    /// Creates a source over `pool`, falling back to [`BROWSER_USER_AGENTS`]
    /// when the pool is empty
    pub fn new(pool: Vec<String>) -> Self {
        if pool.is_empty() {
            Self::default()
        } else {
            Self { pool }
        }
    }

    /// Creates a source from the `[user-agent]` configuration section
    pub fn from_config(config: &UserAgentConfig) -> Self {
        Self::new(config.pool.clone())
    }

    /// Returns the strings this source draws from
    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}

impl Default for RandomUserAgent {
    fn default() -> Self {
        Self {
            pool: BROWSER_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UserAgentSource for RandomUserAgent {
    fn next_user_agent(&self) -> String {
        self.pool[fastrand::usize(..self.pool.len())].clone()
    }
}

/// Always sends the same User-Agent
#[derive(Debug, Clone)]
pub struct FixedUserAgent(String);

impl FixedUserAgent {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self(user_agent.into())
    }
}

impl UserAgentSource for FixedUserAgent {
    fn next_user_agent(&self) -> String {
        self.0.clone()
    }
}
