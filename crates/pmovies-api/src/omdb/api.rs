//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use std::time::Duration;

use thiserror::Error;

use super::params::ParamSet;

/// Failures reaching the OMDb data endpoint.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TransportError {
    /// No response within the configured bound.
    #[error("OMDb request timed out after {0:?}")]
    Timeout(Duration),
    /// Upstream answered with a non-success HTTP status.
    #[error("OMDb API error (HTTP {status})")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// Connection, TLS, or body read failure.
    #[error("OMDb request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// OMDb API trait.
///
/// Abstracts the single upstream call for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Sends one GET with the serialized `params` and returns the raw body.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the request fails, times out, or
    /// upstream answers with a non-success status.
    async fn fetch(&self, params: &ParamSet) -> Result<String, TransportError>;
}
