use std::time::Duration;

// =============================================================================
// Hosting API constants
// =============================================================================

/// Default base URL for the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Timeout for a single API request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Page size used when listing the files changed by a pull request
pub const FILES_PER_PAGE: u32 = 100;

/// GitHub stops listing pull request files after 3000 entries (30 pages of 100)
pub const MAX_FILE_PAGES: u32 = 30;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("version-gate/", env!("CARGO_PKG_VERSION"));

/// REST API version pinned in the `X-GitHub-Api-Version` header
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Connection settings for the hosting API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// API base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_uses_default_timeout() {
        let config = ClientConfig::new(DEFAULT_API_URL, "token");

        assert_eq!(config.timeout, Duration::from_millis(FETCH_TIMEOUT_MS));
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = ClientConfig::new("https://ghe.example.com/api/v3/", "token");

        assert_eq!(config.base_url(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn with_timeout_overrides_default() {
        let config =
            ClientConfig::new(DEFAULT_API_URL, "token").with_timeout(Duration::from_secs(5));

        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
