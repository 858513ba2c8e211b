use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;

/// Largest number of simultaneous downloads a crawl may use
pub const MAX_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.max_resources == Some(0) {
        return Err(ConfigError::Validation(
            "max-resources must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the User-Agent pool
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    for (index, agent) in config.pool.iter().enumerate() {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "user-agent pool entry {} is empty",
                index
            )));
        }

        // Header values cannot carry line breaks
        if agent.contains(['\r', '\n']) {
            return Err(ConfigError::Validation(format!(
                "user-agent pool entry {} contains a line break",
                index
            )));
        }
    }

    Ok(())
}
