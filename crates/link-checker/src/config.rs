//! Link-check tuning and issue-filing configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_REPOSITORY: &str = "moshehbenavraham/Ultimate-Agent-Directory";

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Settings for one link-check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkCheckConfig {
    /// Per-probe timeout
    pub timeout: Duration,
    /// Attempts per URL
    pub retries: u32,
    /// Requests per second per host
    pub rate_limit: usize,
    /// URLs probed concurrently before the next batch starts
    pub batch_size: usize,
    /// Simultaneous connections across all hosts
    pub max_connections: usize,
    /// Simultaneous connections to one host
    pub max_connections_per_host: usize,
    pub user_agent: String,
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        LinkCheckConfig {
            timeout: Duration::from_secs(env_or("AGENTDIR_TIMEOUT_SECS", 10)),
            retries: env_or("AGENTDIR_RETRIES", 3),
            rate_limit: env_or("AGENTDIR_RATE_LIMIT", 5),
            batch_size: env_or("AGENTDIR_BATCH_SIZE", 50),
            max_connections: 100,
            max_connections_per_host: 10,
            user_agent: format!("agentdir-link-checker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LinkCheckConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: usize) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Batch size, at least one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_connection_limits(mut self, total: usize, per_host: usize) -> Self {
        self.max_connections = total.max(1);
        self.max_connections_per_host = per_host.max(1);
        self
    }
}

/// Where and how broken-link issues are filed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueConfig {
    /// `owner/name` of the repository receiving issues
    pub repository: String,
    /// API token; issue filing is skipped without one
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub api_base: String,
}

impl Default for IssueConfig {
    fn default() -> Self {
        IssueConfig {
            repository: std::env::var("GITHUB_REPOSITORY")
                .ok()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string()),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

impl IssueConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn new(repository: &str) -> Self {
        IssueConfig {
            repository: repository.to_string(),
            token: None,
            api_base: "https://api.github.com".to_string(),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let config = LinkCheckConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_retries(1)
            .with_rate_limit(2)
            .with_batch_size(0)
            .with_connection_limits(8, 0);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.retries, 1);
        assert_eq!(config.rate_limit, 2);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.max_connections_per_host, 1);
    }

    #[test]
    fn issue_config_builder() {
        let config = IssueConfig::new("acme/dir")
            .with_token("t0ken")
            .with_api_base("http://localhost:8080/");
        assert_eq!(config.repository, "acme/dir");
        assert_eq!(config.token.as_deref(), Some("t0ken"));
        assert_eq!(config.api_base, "http://localhost:8080");
        assert!(!serde_json::to_string(&config).unwrap().contains("t0ken"));
    }
}
