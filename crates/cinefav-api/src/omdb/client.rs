//! `OmdbClient` - OMDb API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::OmdbApi;
use super::params::{SearchParams, TitleParams};
use super::rate_limiter::OmdbRateLimiter;
use super::types::{OmdbErrorResponse, OmdbSearchResponse, OmdbTitleResponse};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of retries for HTTP 429 / 503 responses.
const MAX_RETRIES: u32 = 3;

/// Default backoff step between retries; the n-th retry waits n steps.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<OmdbRateLimiter>>,
    /// Backoff step for HTTP 429 / 503 retries.
    retry_backoff: Duration,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    min_interval: Option<Duration>,
    retry_backoff: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
            min_interval: None,
            retry_backoff: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the total request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the minimum request interval (default: 100ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the backoff step between HTTP 429 / 503 retries (default: 1s).
    #[must_use]
    pub const fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be blank");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(OmdbRateLimiter::default_interval, OmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
            retry_backoff: self.retry_backoff.unwrap_or(RETRY_BACKOFF),
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429 and 503.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(self.base_url.clone())
                .query(&[("apikey", self.api_key.as_str())])
                .query(query)
                .build()
                .context("failed to build OMDb request")?;

            // The URL carries the API key; log only the caller's parameters.
            tracing::debug!(?query, "OMDb API request");

            let response = self
                .http_client
                .execute(request)
                .await
                .context("OMDb request failed")?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
            {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("OMDb API unavailable after {MAX_RETRIES} retries (HTTP {status})");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    %status,
                    "OMDb API throttled. Retrying..."
                );
                tokio::time::sleep(self.retry_backoff.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            let body = response
                .text()
                .await
                .context("failed to read OMDb response body")?;

            if !status.is_success() {
                if let Ok(error_response) = serde_json::from_str::<OmdbErrorResponse>(&body) {
                    bail!(
                        "OMDb API error (HTTP {status}): {}",
                        error_response.error
                    );
                }
                bail!("OMDb API error (HTTP {status}): {body}");
            }

            return serde_json::from_str(&body).context("failed to decode OMDb JSON response");
        }
    }
}

impl OmdbApi for OmdbClient {
    #[instrument(skip_all, fields(query = %params.query, page = params.page))]
    async fn search(&self, params: &SearchParams) -> Result<OmdbSearchResponse> {
        self.get_json(&params.to_query()).await
    }

    #[instrument(skip_all, fields(imdb_id = %params.imdb_id))]
    async fn title(&self, params: &TitleParams) -> Result<OmdbTitleResponse> {
        self.get_json(&params.to_query()).await
    }
}
