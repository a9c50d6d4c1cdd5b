//! Search orchestration.
//!
//! Composes `ParamBuilder`, one upstream call, and the normalizer into
//! the outcome handed to the presentation layer.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::instrument;

use crate::omdb::normalize::{self, NormalizeError};
use crate::omdb::{
    Clock, DEFAULT_TIMEOUT, Item, LocalOmdbApi, Param, ParamBuilder, ParamError, ParamSet,
    RequiredParam, SystemClock, TransportError,
};

/// Message for a search without a filter.
const MISSING_FILTER: &str = "Missing param \"filter\"! Unable to make a search!";

/// Message for a search upstream has no hits for.
const NO_RESULTS: &str = "No results for the given filter were found!";

/// Search failure, one variant per HTTP-equivalent outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum SearchError {
    /// Missing or empty required input.
    #[error("{0}")]
    BadRequest(String),
    /// Upstream reported no match.
    #[error("{0}")]
    NotFound(String),
    /// An optional parameter failed validation.
    #[error("{0}")]
    UnprocessableEntity(String),
    /// Upstream could not be reached or sent an unusable body.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Upstream did not answer within the bound.
    #[error("OMDb did not respond within {0:?}")]
    GatewayTimeout(Duration),
}

impl SearchError {
    /// HTTP status code equivalent.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::UnprocessableEntity(_) => 422,
            Self::ServiceUnavailable(_) => 503,
            Self::GatewayTimeout(_) => 504,
        }
    }

    /// Error envelope: `{"error": "<message>"}`.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<ParamError> for SearchError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::EmptyRequired(_) => Self::BadRequest(err.to_string()),
            ParamError::InvalidValue { .. } | ParamError::Locked(_) => {
                Self::UnprocessableEntity(err.to_string())
            }
        }
    }
}

impl From<TransportError> for SearchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(bound) => Self::GatewayTimeout(bound),
            TransportError::Status { .. } | TransportError::Request(_) => {
                Self::ServiceUnavailable(err.to_string())
            }
        }
    }
}

impl From<NormalizeError> for SearchError {
    fn from(err: NormalizeError) -> Self {
        Self::ServiceUnavailable(err.to_string())
    }
}

/// Successful search payload: `{"search": [Item...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchPayload {
    /// Normalized hits on the requested page.
    pub search: Vec<Item>,
}

/// Runs searches and lookups against an OMDb API implementation.
///
/// Every call builds a fresh `ParamSet`; the service itself holds no
/// per-request state.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchService<A, C = SystemClock> {
    api: A,
    api_key: Option<String>,
    timeout: Duration,
    clock: C,
}

impl<A: LocalOmdbApi> SearchService<A> {
    /// Creates a service using the system clock and the default timeout.
    #[must_use]
    pub const fn new(api: A, api_key: Option<String>) -> Self {
        Self {
            api,
            api_key,
            timeout: DEFAULT_TIMEOUT,
            clock: SystemClock,
        }
    }
}

#[allow(clippy::future_not_send)]
impl<A: LocalOmdbApi, C: Clock + Clone> SearchService<A, C> {
    /// Replaces the clock used for the `year` check.
    #[must_use]
    pub fn with_clock<D: Clock + Clone>(self, clock: D) -> SearchService<A, D> {
        SearchService {
            api: self.api,
            api_key: self.api_key,
            timeout: self.timeout,
            clock,
        }
    }

    /// Sets the bound on a single upstream call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Searches OMDb by free text.
    ///
    /// `kind`, `year`, and `page` are attached in that order when present
    /// and non-empty.
    ///
    /// # Errors
    ///
    /// - `SearchError::BadRequest` if `filter` is empty (no upstream call).
    /// - `SearchError::UnprocessableEntity` if an optional value is illegal.
    /// - `SearchError::ServiceUnavailable` on transport or decoding failure.
    /// - `SearchError::GatewayTimeout` if upstream does not answer in time.
    /// - `SearchError::NotFound` if upstream reports no results.
    #[instrument(skip_all)]
    pub async fn search(
        &self,
        filter: &str,
        kind: Option<&str>,
        year: Option<&str>,
        page: Option<&str>,
    ) -> Result<SearchPayload, SearchError> {
        if filter.is_empty() {
            return Err(SearchError::BadRequest(String::from(MISSING_FILTER)));
        }

        let optional = [(Param::Type, kind), (Param::Year, year), (Param::Page, page)]
            .into_iter()
            .filter_map(|(param, value)| value.filter(|v| !v.is_empty()).map(|v| (param, v)));

        let mut builder = self.builder(RequiredParam::Search, filter)?;
        builder.add_all(optional)?;
        let params = builder.build();

        tracing::debug!(filter = %filter, params = %params, "OMDb search");

        let body = self.call(&params).await?;
        let result = normalize::parse(&body)?;

        if !result.is_success() {
            tracing::debug!(
                filter = %filter,
                upstream_error = ?result.error_message(),
                "OMDb search returned no results"
            );
            return Err(SearchError::NotFound(String::from(NO_RESULTS)));
        }

        tracing::debug!(
            total_results = result.total_results(),
            pages = normalize::page_count(result.total_results()),
            "OMDb search completed"
        );

        Ok(SearchPayload {
            search: result.into_items(),
        })
    }

    /// Looks up a single record by exact title.
    ///
    /// # Errors
    ///
    /// Same as [`Self::search`], with `NotFound` carrying the upstream message.
    #[instrument(skip_all)]
    pub async fn lookup_title(&self, title: &str) -> Result<Map<String, Value>, SearchError> {
        self.lookup(RequiredParam::Title, title).await
    }

    /// Looks up a single record by IMDb identifier.
    ///
    /// # Errors
    ///
    /// Same as [`Self::search`], with `NotFound` carrying the upstream message.
    #[instrument(skip_all)]
    pub async fn lookup_imdb_id(&self, imdb_id: &str) -> Result<Map<String, Value>, SearchError> {
        self.lookup(RequiredParam::ImdbId, imdb_id).await
    }

    async fn lookup(
        &self,
        required: RequiredParam,
        value: &str,
    ) -> Result<Map<String, Value>, SearchError> {
        let params = self.builder(required, value)?.build();
        tracing::debug!(params = %params, "OMDb lookup");

        let body = self.call(&params).await?;
        let detail = normalize::parse_detail(&body)?;

        match (detail.error_message().map(String::from), detail.into_record()) {
            (_, Some(record)) => Ok(record),
            (message, None) => Err(SearchError::NotFound(
                message.unwrap_or_else(|| String::from(NO_RESULTS)),
            )),
        }
    }

    fn builder(
        &self,
        required: RequiredParam,
        value: &str,
    ) -> Result<ParamBuilder<C>, ParamError> {
        ParamBuilder::with_clock(
            required,
            value,
            self.api_key.as_deref(),
            self.clock.clone(),
        )
    }

    /// Issues the single upstream call under the configured bound.
    async fn call(&self, params: &ParamSet) -> Result<String, SearchError> {
        match tokio::time::timeout(self.timeout, self.api.fetch(params)).await {
            Ok(result) => result.map_err(|e| {
                tracing::warn!(error = %e, "OMDb request failed");
                SearchError::from(e)
            }),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "OMDb request timed out");
                Err(SearchError::GatewayTimeout(self.timeout))
            }
        }
    }
}
