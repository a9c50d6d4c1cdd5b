//! OMDb API module.
//!
//! Builds validated query parameters, sends them to the OMDb data
//! endpoint, and reshapes the response bodies.

mod api;
mod client;
mod clock;
pub mod normalize;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi, TransportError};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_DATA_SUB_HOST, DEFAULT_HOST, DEFAULT_TIMEOUT, OmdbClient, OmdbClientBuilder,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use normalize::NormalizeError;
pub use params::{
    API_VERSION, Param, ParamBuilder, ParamError, ParamSet, PlotValue, RequiredParam, ReturnFormat,
    TypeValue,
};
pub use types::{DetailResult, Item, RawItem, SearchResult};
