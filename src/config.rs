use std::time::Duration;

use crate::rate_limit::RateLimiter;
use crate::retry::RetryConfig;

/// Default NCBI E-utilities endpoint
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// IDs per EFetch request; NCBI asks for at most 200 on GET requests
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Configuration for [`PubMedClient`](crate::PubMedClient)
///
/// # Example
///
/// ```
/// use pubmed_affiliations::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("researcher@university.edu")
///     .with_tool("get-papers-list");
///
/// assert_eq!(config.effective_rate_limit(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key, raises the rate limit to 10 requests/second
    pub api_key: Option<String>,
    /// Contact email sent with every request
    pub email: Option<String>,
    /// Tool name sent with every request
    pub tool: Option<String>,
    /// Explicit requests per second, overrides the API key default
    pub rate_limit: Option<f64>,
    /// Base URL, replaced in tests with a mock server
    pub base_url: Option<String>,
    /// HTTP timeout per request
    pub timeout: Duration,
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Backoff policy for transient failures
    pub retry_config: RetryConfig,
    /// PMIDs per EFetch request
    pub batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            rate_limit: None,
            base_url: None,
            timeout: Duration::from_secs(30),
            user_agent: None,
            retry_config: RetryConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: f64) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Set the EFetch batch size; zero is treated as one
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Requests per second actually applied
    pub fn effective_rate_limit(&self) -> f64 {
        match (self.rate_limit, &self.api_key) {
            (Some(rate), _) => rate,
            (None, Some(_)) => 10.0,
            (None, None) => 3.0,
        }
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pubmed-affiliations/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or("pubmed-affiliations")
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }

    /// Query parameters identifying the caller to NCBI
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }

        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }

        params.push(("tool".to_string(), self.effective_tool().to_string()));

        params
    }
}
