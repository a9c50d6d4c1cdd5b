//! `OmdbClient` - OMDb data endpoint client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::{LocalOmdbApi, TransportError};
use super::params::ParamSet;

/// Default OMDb host.
pub const DEFAULT_HOST: &str = "omdbapi.com";

/// Default sub-host serving the data endpoint.
pub const DEFAULT_DATA_SUB_HOST: &str = "www";

/// Default bound on a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Data endpoint URL.
    base_url: Url,
    /// Per-request bound, reported in `TransportError::Timeout`.
    timeout: Duration,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    host: Option<String>,
    data_sub_host: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            host: None,
            data_sub_host: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the whole data endpoint URL (for wiremock in tests).
    ///
    /// Takes precedence over `host` and `data_sub_host`.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the OMDb host (default: `omdbapi.com`).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the data sub-host (default: `www`).
    #[must_use]
    pub fn data_sub_host(mut self, sub_host: impl Into<String>) -> Self {
        self.data_sub_host = Some(sub_host.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - The URL assembled from `host` and `data_sub_host` is invalid.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
            let sub_host = self
                .data_sub_host
                .as_deref()
                .unwrap_or(DEFAULT_DATA_SUB_HOST);
            let raw = format!("https://{sub_host}.{host}/");
            Url::parse(&raw).with_context(|| format!("invalid OMDb base URL: {raw}"))?
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            timeout,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Data endpoint URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Request(err)
        }
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip_all)]
    async fn fetch(&self, params: &ParamSet) -> Result<String, TransportError> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&params.serialize())
            .build()
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(%params, "OMDb API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            tracing::warn!(%status, %body, "OMDb API error response");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        tracing::debug!(body_len = body.len(), "OMDb response body received");
        Ok(body)
    }
}
