//! Reshapes OMDb response bodies into `SearchResult` / `DetailResult`.
//!
//! `totalResults` is tolerant (falls back to 0). `Year` is not: one
//! malformed hit fails the whole response.

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{DetailResult, Item, RawItem, SearchEnvelope, SearchResult};

/// `Response` value marking a successful lookup.
pub const RESPONSE_TRUE: &str = "True";

/// `Response` value marking a failed lookup.
pub const RESPONSE_FALSE: &str = "False";

/// Poster value OMDb sends when there is no image.
const POSTER_NOT_AVAILABLE: &str = "N/A";

/// Hits per OMDb search page.
pub const MAX_RESULTS_IN_SEARCH: u32 = 10;

/// Failures turning an OMDb body into a normalized result.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum NormalizeError {
    /// Body is not JSON or does not have the envelope shape.
    #[error("failed to decode OMDb response: {0}")]
    Json(#[from] serde_json::Error),
    /// A hit carries a `Year` that is not an integer.
    #[error("malformed Year \"{year}\" for \"{title}\"")]
    Year {
        /// Title of the offending hit.
        title: String,
        /// Raw `Year` value.
        year: String,
    },
}

/// Classification of the `Response` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseStatus {
    /// Exactly `"True"`.
    Found,
    /// Exactly `"False"`.
    NotFound,
    /// Missing or any other value.
    Unexpected,
}

fn classify(response: Option<&str>) -> ResponseStatus {
    match response {
        Some(RESPONSE_TRUE) => ResponseStatus::Found,
        Some(RESPONSE_FALSE) => ResponseStatus::NotFound,
        _ => ResponseStatus::Unexpected,
    }
}

/// Fallback message when upstream marks neither success nor failure.
fn unexpected_message(response: Option<&str>) -> String {
    response.map_or_else(
        || String::from("OMDb response has no Response field"),
        |r| format!("unexpected OMDb Response value \"{r}\""),
    )
}

/// Parses a search response body.
///
/// Only an exact `"True"` counts as success; `"False"`, a missing marker,
/// or any other value produce a failed result.
///
/// # Errors
///
/// - `NormalizeError::Json` if the body is not a JSON envelope.
/// - `NormalizeError::Year` if any hit has a non-integer `Year`.
pub fn parse(raw_json: &str) -> Result<SearchResult, NormalizeError> {
    let envelope: SearchEnvelope = serde_json::from_str(raw_json)?;
    let response = envelope.response.as_deref();

    match classify(response) {
        ResponseStatus::Found => {
            let total_results = envelope
                .total_results
                .as_deref()
                .map_or(0, total_results_number);
            let items = envelope
                .search
                .unwrap_or_default()
                .iter()
                .map(normalize_item)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SearchResult::found(total_results, items))
        }
        ResponseStatus::NotFound => Ok(SearchResult::failed(envelope.error)),
        ResponseStatus::Unexpected => {
            tracing::warn!(?response, "OMDb search response has no True/False marker");
            Ok(SearchResult::failed(Some(
                envelope
                    .error
                    .unwrap_or_else(|| unexpected_message(response)),
            )))
        }
    }
}

/// Reshapes one raw hit.
///
/// # Errors
///
/// Returns `NormalizeError::Year` if `Year` does not parse as an integer.
pub fn normalize_item(raw: &RawItem) -> Result<Item, NormalizeError> {
    let year = raw
        .year
        .parse::<i32>()
        .map_err(|_| NormalizeError::Year {
            title: raw.title.clone(),
            year: raw.year.clone(),
        })?;

    let poster_url = raw
        .poster
        .as_deref()
        .filter(|p| *p != POSTER_NOT_AVAILABLE)
        .map(String::from);

    Ok(Item {
        title: raw.title.clone(),
        year,
        imdb_id: raw.imdb_id.clone(),
        kind: raw.kind.clone(),
        poster_url,
    })
}

/// Parses `totalResults`, returning 0 when it is not a number.
///
/// The count is unsigned: a negative value such as `"-4"` is treated as
/// unparseable and also yields 0.
#[must_use]
pub fn total_results_number(raw: &str) -> u32 {
    raw.parse().unwrap_or(0)
}

/// Number of search pages needed for `total_results` hits.
#[must_use]
pub const fn page_count(total_results: u32) -> u32 {
    total_results.div_ceil(MAX_RESULTS_IN_SEARCH)
}

/// Parses a title or IMDb id lookup body.
///
/// Uses the same `Response` rules as [`parse`]. On success the record
/// is returned without its `Response` key.
///
/// # Errors
///
/// Returns `NormalizeError::Json` if the body is not a JSON object.
pub fn parse_detail(raw_json: &str) -> Result<DetailResult, NormalizeError> {
    let mut record: Map<String, Value> = serde_json::from_str(raw_json)?;
    let response = record
        .remove("Response")
        .and_then(|v| v.as_str().map(String::from));
    let error = record
        .get("Error")
        .and_then(Value::as_str)
        .map(String::from);

    match classify(response.as_deref()) {
        ResponseStatus::Found => Ok(DetailResult::found(record)),
        ResponseStatus::NotFound => Ok(DetailResult::failed(error)),
        ResponseStatus::Unexpected => {
            tracing::warn!(?response, "OMDb lookup response has no True/False marker");
            Ok(DetailResult::failed(Some(
                error.unwrap_or_else(|| unexpected_message(response.as_deref())),
            )))
        }
    }
}
