// ReadLog - Open Library Reading List Client
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP client for the Open Library catalog
//!
//! Thin wrapper around `reqwest::Client` with:
//! - Base URL management (catalog host and covers host)
//! - Default headers (User-Agent, Accept)
//! - Request timeout
//! - Retry logic with exponential backoff
//!
//! ## Retry Strategy
//! - Maximum `max_retries` attempts (default 3)
//! - Exponential backoff: 1s, 2s, 4s between attempts
//! - Retry on: transient network errors, 5xx responses
//! - No retry on: 4xx responses, malformed bodies
//!
//! The catalog endpoints are read-only and unauthenticated, so there is no
//! token handling here.

use crate::error::{ReadLogError, Result};
use crate::library::models::DEFAULT_COVERS_BASE_URL;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use url::Url;

/// Default catalog host
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Reading log owner for this deployment
pub const DEFAULT_USER_ID: &str = "mekBot";

/// Number of reading log entries kept from the server response
pub const READING_LOG_LIMIT: usize = 20;

/// Maximum attempts per request (1 initial + 2 retries)
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial retry delay in seconds (exponential backoff: 1s, 2s, 4s)
const INITIAL_RETRY_DELAY_SECS: u64 = 1;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_BASE_URL: &str = "READLOG_BASE_URL";
const ENV_COVERS_URL: &str = "READLOG_COVERS_URL";
const ENV_USER_ID: &str = "READLOG_USER_ID";

/// Configuration for CatalogClient
/// Provides a builder pattern for client customization
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog host, e.g. https://openlibrary.org
    pub base_url: String,
    /// Cover image host, e.g. https://covers.openlibrary.org
    pub covers_base_url: String,
    /// Whose reading log to load
    pub user_id: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub user_agent: String,
    /// Cap applied to the reading log
    pub reading_log_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            covers_base_url: DEFAULT_COVERS_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: MAX_RETRY_ATTEMPTS,
            user_agent: format!("ReadLog/{} (readlog-core)", env!("CARGO_PKG_VERSION")),
            reading_log_limit: READING_LOG_LIMIT,
        }
    }
}

impl CatalogConfig {
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }

    /// Defaults overlaid with `READLOG_BASE_URL`, `READLOG_COVERS_URL` and `READLOG_USER_ID`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Ok(covers_base_url) = std::env::var(ENV_COVERS_URL) {
            config.covers_base_url = covers_base_url;
        }
        if let Ok(user_id) = std::env::var(ENV_USER_ID) {
            config.user_id = user_id;
        }

        config
    }

    /// Check that both hosts parse as URLs and the user id is usable
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("base_url", &self.base_url), ("covers_base_url", &self.covers_base_url)] {
            let parsed = Url::parse(value).map_err(|e| {
                ReadLogError::InvalidConfiguration(format!("{} '{}': {}", name, value, e))
            })?;
            if parsed.cannot_be_a_base() {
                return Err(ReadLogError::InvalidConfiguration(format!(
                    "{} '{}' cannot be used as a base URL",
                    name, value
                )));
            }
        }

        if self.user_id.trim().is_empty() {
            return Err(ReadLogError::InvalidConfiguration("user_id is empty".to_string()));
        }

        if self.max_retries == 0 {
            return Err(ReadLogError::InvalidConfiguration(
                "max_retries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for CatalogConfig
#[derive(Debug)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CatalogConfig::default(),
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn covers_base_url<S: Into<String>>(mut self, covers_base_url: S) -> Self {
        self.config.covers_base_url = covers_base_url.into();
        self
    }

    pub fn user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.config.user_id = user_id.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn reading_log_limit(mut self, limit: usize) -> Self {
        self.config.reading_log_limit = limit;
        self
    }

    pub fn build(self) -> CatalogConfig {
        self.config
    }
}

impl Default for CatalogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the catalog's reading-log and search endpoints
///
/// Holds no session state; every call is independent.
///
/// # Example
/// ```rust,no_run
/// use readlog_core::api::CatalogClient;
///
/// # async fn example() -> readlog_core::error::Result<()> {
/// let client = CatalogClient::new()?;
/// let log = client.fetch_reading_log("mekBot").await?;
/// let hits = client.search_by_title("dune").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    /// Underlying HTTP client
    client: Client,
    /// Catalog base URL without trailing slash
    base_url: String,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new CatalogClient with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CatalogConfig::default())
    }

    /// Create a new CatalogClient with custom configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be built
    pub fn with_config(config: CatalogConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ReadLogError::InvalidInput(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfig::builder()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Perform a GET request
    pub async fn get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        self.request_with_retry(|client| client.get(&url)).await
    }

    /// Perform a GET request with query parameters
    pub async fn get_with_query<T, Q>(&self, endpoint: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        self.request_with_retry(|client| client.get(&url).query(query))
            .await
    }

    /// Execute request with retry logic and exponential backoff
    ///
    /// Retries on:
    /// - Network errors (connection failure, timeout)
    /// - 5xx server errors
    ///
    /// No retry on:
    /// - 4xx client errors
    /// - Successful responses whose body fails to parse
    async fn request_with_retry<T, F>(&self, request_builder: F) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(&Client) -> reqwest::RequestBuilder,
    {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            attempts += 1;

            let request = request_builder(&self.client).build()?;
            debug!(attempt = attempts, url = %request.url(), "catalog request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();

                    match status {
                        s if s.is_success() => {
                            return self.handle_success_response(response).await;
                        }

                        // 5xx Server Error - retry with backoff
                        s if s.is_server_error() && attempts < self.config.max_retries => {
                            let endpoint = self.extract_endpoint_from_url(response.url().as_str());
                            let error_body = response.text().await.unwrap_or_default();
                            last_error = Some(ReadLogError::api_failed(
                                format!("Server error: {}", error_body),
                                Some(status.as_u16()),
                                Some(endpoint),
                            ));

                            self.backoff(attempts).await;
                            continue;
                        }

                        _ => {
                            return self.handle_error_response(response).await;
                        }
                    }
                }

                Err(e) if attempts < self.config.max_retries && self.is_retryable_network_error(&e) => {
                    last_error = Some(ReadLogError::network_error(
                        format!("Network request failed: {}", e),
                        true,
                    ));

                    self.backoff(attempts).await;
                    continue;
                }

                Err(e) => {
                    let is_transient = self.is_retryable_network_error(&e);
                    return Err(ReadLogError::network_error(
                        format!("Network request failed: {}", e),
                        is_transient,
                    ));
                }
            }
        }

        // All retries exhausted
        Err(last_error.unwrap_or_else(|| ReadLogError::ApiRequestFailed {
            message: format!("Request failed after {} attempts", attempts),
            status_code: None,
            endpoint: None,
        }))
    }

    async fn backoff(&self, attempts: u32) {
        let delay = retry_delay(attempts);
        debug!(attempt = attempts, delay_secs = delay.as_secs(), "retrying catalog request");
        sleep(delay).await;
    }

    /// Handle successful HTTP response
    async fn handle_success_response<T>(&self, response: Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let url = response.url().clone();

        // Read the text first so a parse error can carry context
        let response_text = response.text().await.map_err(|e| ReadLogError::ApiRequestFailed {
            message: format!("Failed to read response body: {}", e),
            status_code: Some(status.as_u16()),
            endpoint: Some(url.path().to_string()),
        })?;

        match serde_json::from_str::<T>(&response_text) {
            Ok(data) => Ok(data),
            Err(e) => {
                let context = error_context(&response_text, e.column());

                Err(ReadLogError::InvalidApiResponse {
                    message: format!(
                        "Parse error: {} at col {}. Context: ...{}...",
                        e,
                        e.column(),
                        context
                    ),
                    response_body: Some(response_text),
                })
            }
        }
    }

    /// Handle error HTTP response
    async fn handle_error_response<T>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().clone();
        let error_body = response.text().await.unwrap_or_default();

        Err(ReadLogError::api_failed(
            format!("API request failed: {}", error_body),
            Some(status.as_u16()),
            Some(self.extract_endpoint_from_url(url.as_str())),
        ))
    }

    fn is_retryable_network_error(&self, error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect() || error.is_request()
    }

    /// Extract endpoint path from full URL
    fn extract_endpoint_from_url(&self, url: &str) -> String {
        url.strip_prefix(&self.base_url)
            .unwrap_or(url)
            .to_string()
    }
}

/// Delay before retry number `attempts`: 1 s, 2 s, 4 s, ... saturating instead of overflowing
fn retry_delay(attempts: u32) -> Duration {
    let factor = 2_u64.saturating_pow(attempts.saturating_sub(1));
    Duration::from_secs(INITIAL_RETRY_DELAY_SECS.saturating_mul(factor))
}

/// Up to 400 bytes either side of `column`, clamped to char boundaries
fn error_context(text: &str, column: usize) -> &str {
    let mut start = column.saturating_sub(400).min(text.len());
    let mut end = (column + 400).min(text.len());

    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end += 1;
    }

    &text[start..end]
}

// ===== TESTS =====
