//! HTTP client for the Yahoo Finance JSON APIs.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tickvault_types::{ProviderError, Ticker};
use tokio::sync::OnceCell;

use crate::url::{COOKIE_URL, QUERY1_BASE_URL, QUERY2_BASE_URL, crumb_url};

/// Browser user agent sent by default; the API hosts throttle non-browser agents.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout (separate from request timeout).
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Base URL of the chart and crumb host.
    pub query1_base: String,
    /// Base URL of the quoteSummary host.
    pub query2_base: String,
    /// URL visited to obtain the session cookie.
    pub cookie_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: BROWSER_USER_AGENT.to_string(),
            query1_base: QUERY1_BASE_URL.to_string(),
            query2_base: QUERY2_BASE_URL.to_string(),
            cookie_url: COOKIE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Points both API hosts and the cookie URL at one base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.query1_base.clone_from(&base);
        self.query2_base.clone_from(&base);
        self.cookie_url = base;
        self
    }
}

/// Yahoo Finance client with a cookie store and a cached crumb.
///
/// Requests are issued one at a time and are never retried.
#[derive(Debug)]
pub struct YahooClient {
    client: Client,
    config: ClientConfig,
    crumb: OnceCell<String>,
}

impl YahooClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            // The crumb is only valid together with the session cookie
            .cookie_store(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        Ok(Self {
            client,
            config,
            crumb: OnceCell::new(),
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, ProviderError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the session crumb, performing the cookie handshake on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Crumb`] if the provider does not hand out a crumb.
    pub async fn crumb(&self) -> Result<&str, ProviderError> {
        self.crumb
            .get_or_try_init(|| self.fetch_crumb())
            .await
            .map(String::as_str)
    }

    async fn fetch_crumb(&self) -> Result<String, ProviderError> {
        // Only the Set-Cookie header matters; the status is usually 404
        if let Err(e) = self.client.get(&self.config.cookie_url).send().await {
            tracing::debug!(error = %e, "cookie request failed, requesting crumb anyway");
        }

        let url = crumb_url(&self.config.query1_base);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Crumb(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Crumb(e.to_string()))?;

        let crumb = body.trim();
        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return Err(ProviderError::Crumb(format!("status {status}, body '{crumb}'")));
        }
        tracing::debug!("obtained provider crumb");
        Ok(crumb.to_string())
    }

    /// Performs a GET request and returns the body.
    ///
    /// A 404 is reported as an unknown identifier.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn get_text(&self, ticker: &Ticker, url: &str) -> Result<String, ProviderError> {
        tracing::debug!(%url, "provider request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::UnknownIdentifier(ticker.to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.query1_base, QUERY1_BASE_URL);
        assert_eq!(config.query2_base, QUERY2_BASE_URL);
        assert_eq!(config.user_agent, BROWSER_USER_AGENT);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_with_user_agent() {
        let config = ClientConfig::default().with_user_agent("tickvault-test/1.0");
        assert_eq!(config.user_agent, "tickvault-test/1.0");
    }

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(1));
        assert_eq!(config.query1_base, "http://127.0.0.1:9");
        assert_eq!(config.query2_base, "http://127.0.0.1:9");
        assert_eq!(config.cookie_url, "http://127.0.0.1:9");
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = YahooClient::with_defaults();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_crumb_error() {
        // Port 9 (discard) is not served on loopback in test environments
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client = YahooClient::new(config).unwrap();
        assert!(matches!(client.crumb().await, Err(ProviderError::Crumb(_))));
    }
}
