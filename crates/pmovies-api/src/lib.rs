//! OMDb search core for pmovies.
//!
//! Builds validated OMDb query parameters, normalizes OMDb search
//! responses, and composes both around a single upstream call.

/// OMDb parameter tables, client, and response normalizer.
pub mod omdb;

/// Search orchestration exposed to the presentation layer.
pub mod search;
