//! OMDb response envelope and normalized result types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reads a JSON scalar as text.
///
/// Strings pass through, numbers and other values keep their JSON
/// rendering, and `null` reads as absent. Parsing the text is left to
/// the normalizer.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

fn scalar_text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(deserializer).map(Option::unwrap_or_default)
}

// --- Upstream ---

/// Raw search response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchEnvelope {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    /// Total hit count, usually a decimal string.
    #[serde(rename = "totalResults", default, deserialize_with = "scalar_text")]
    pub total_results: Option<String>,
    /// Hits on the requested page.
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<RawItem>>,
    /// Failure message.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// A single raw search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    /// Title.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Year as sent upstream (e.g. `"1999"` or `1999`).
    #[serde(rename = "Year", default, deserialize_with = "scalar_text_or_empty")]
    pub year: String,
    /// IMDb identifier.
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    /// `movie`, `series`, or `episode`.
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Poster URL or the literal `"N/A"`.
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

// --- Normalized ---

/// A search hit reshaped for downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// IMDb identifier.
    pub imdb_id: String,
    /// `movie`, `series`, or `episode`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Poster URL; `None` when upstream has no poster.
    #[serde(rename = "poster")]
    pub poster_url: Option<String>,
}

/// Normalized outcome of a search response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchResult {
    success: bool,
    total_results: u32,
    items: Vec<Item>,
    error_message: Option<String>,
}

impl SearchResult {
    pub(crate) const fn found(total_results: u32, items: Vec<Item>) -> Self {
        Self {
            success: true,
            total_results,
            items,
            error_message: None,
        }
    }

    pub(crate) const fn failed(error_message: Option<String>) -> Self {
        Self {
            success: false,
            total_results: 0,
            items: Vec::new(),
            error_message,
        }
    }

    /// Whether upstream reported results.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Total hits across all pages (0 when unknown).
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Hits on the returned page.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Upstream failure message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Consumes the result, returning the hits.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

/// Outcome of a title or IMDb id lookup.
///
/// The record is passed through as upstream sent it, minus the
/// `Response` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailResult {
    record: Option<Map<String, Value>>,
    error_message: Option<String>,
}

impl DetailResult {
    pub(crate) const fn found(record: Map<String, Value>) -> Self {
        Self {
            record: Some(record),
            error_message: None,
        }
    }

    pub(crate) const fn failed(error_message: Option<String>) -> Self {
        Self {
            record: None,
            error_message,
        }
    }

    /// Whether upstream found the record.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.record.is_some()
    }

    /// Borrows the record.
    #[must_use]
    pub const fn record(&self) -> Option<&Map<String, Value>> {
        self.record.as_ref()
    }

    /// Upstream failure message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Consumes the result, returning the record.
    #[must_use]
    pub fn into_record(self) -> Option<Map<String, Value>> {
        self.record
    }
}
