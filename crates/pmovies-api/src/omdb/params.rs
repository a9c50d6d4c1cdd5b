//! OMDb request parameter tables, `ParamSet`, and `ParamBuilder`.

use std::fmt;

use thiserror::Error;

use super::clock::{Clock, SystemClock};

/// OMDb API version sent with every request.
pub const API_VERSION: &str = "1";

// --- Parameter table ---

/// Query parameters recognized by the OMDb data endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Search phrase (`s`).
    Search,
    /// Exact title (`t`).
    Title,
    /// IMDb identifier (`i`).
    ImdbId,
    /// Result type filter (`type`).
    Type,
    /// Plot length (`plot`).
    Plot,
    /// Release year (`y`).
    Year,
    /// Result page (`page`).
    Page,
    /// Response format (`r`).
    ReturnFormat,
    /// API version (`v`).
    Version,
    /// Access key (`apikey`).
    ApiKey,
}

impl Param {
    /// Every parameter, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Search,
        Self::Title,
        Self::ImdbId,
        Self::Type,
        Self::Plot,
        Self::Year,
        Self::Page,
        Self::ReturnFormat,
        Self::Version,
        Self::ApiKey,
    ];

    /// Query-string name sent upstream.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Search => "s",
            Self::Title => "t",
            Self::ImdbId => "i",
            Self::Type => "type",
            Self::Plot => "plot",
            Self::Year => "y",
            Self::Page => "page",
            Self::ReturnFormat => "r",
            Self::Version => "v",
            Self::ApiKey => "apikey",
        }
    }

    /// Looks up a parameter by its query-string name.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.wire_name() == name)
    }

    /// Whether this is one of the three mutually exclusive required kinds.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Search | Self::Title | Self::ImdbId)
    }

    /// Whether the value can only be set when the set is constructed.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        self.is_required() || matches!(self, Self::Version | Self::ApiKey)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The required parameter a `ParamSet` is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredParam {
    /// Free-text search (`s`).
    Search,
    /// Exact title lookup (`t`).
    Title,
    /// IMDb identifier lookup (`i`).
    ImdbId,
}

impl RequiredParam {
    /// The underlying query parameter.
    #[must_use]
    pub const fn param(self) -> Param {
        match self {
            Self::Search => Param::Search,
            Self::Title => Param::Title,
            Self::ImdbId => Param::ImdbId,
        }
    }
}

// --- Closed value sets ---

/// Allowed values of the `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeValue {
    /// `movie`
    Movie,
    /// `series`
    Series,
    /// `episode`
    Episode,
}

impl TypeValue {
    /// Every allowed value.
    pub const ALL: [Self; 3] = [Self::Movie, Self::Series, Self::Episode];

    /// Value as sent upstream.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }

    /// Parses an exact, case-sensitive wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.wire_value() == value)
    }
}

/// Allowed values of the `plot` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotValue {
    /// `short`
    Short,
    /// `full`
    Full,
}

impl PlotValue {
    /// Every allowed value.
    pub const ALL: [Self; 2] = [Self::Short, Self::Full];

    /// Value as sent upstream.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }

    /// Parses an exact, case-sensitive wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.wire_value() == value)
    }
}

/// Allowed values of the `r` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnFormat {
    /// `json`
    Json,
    /// `xml`
    Xml,
}

impl ReturnFormat {
    /// Every allowed value.
    pub const ALL: [Self; 2] = [Self::Json, Self::Xml];

    /// Value as sent upstream.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Parses an exact, case-sensitive wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.wire_value() == value)
    }
}

// --- Validators ---

/// Value check for a parameter; receives the current year.
type Validator = fn(&str, i32) -> bool;

/// Selects the value check for `param`. `None` means any value is accepted.
const fn validator_for(param: Param) -> Option<Validator> {
    match param {
        Param::Type => Some(is_type_value),
        Param::Plot => Some(is_plot_value),
        Param::ReturnFormat => Some(is_return_format_value),
        Param::Year => Some(is_year_value),
        Param::Page => Some(is_page_value),
        Param::Search | Param::Title | Param::ImdbId | Param::Version | Param::ApiKey => None,
    }
}

fn is_type_value(value: &str, _current_year: i32) -> bool {
    TypeValue::from_wire(value).is_some()
}

fn is_plot_value(value: &str, _current_year: i32) -> bool {
    PlotValue::from_wire(value).is_some()
}

fn is_return_format_value(value: &str, _current_year: i32) -> bool {
    ReturnFormat::from_wire(value).is_some()
}

fn is_year_value(value: &str, current_year: i32) -> bool {
    value
        .parse::<i32>()
        .is_ok_and(|year| (1..=current_year).contains(&year))
}

fn is_page_value(value: &str, _current_year: i32) -> bool {
    value.parse::<i32>().is_ok_and(|page| page >= 1)
}

// --- Errors ---

/// Parameter construction and mutation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ParamError {
    /// The required parameter was given an empty value.
    #[error("required param \"{0}\" must not be empty")]
    EmptyRequired(Param),
    /// The value is outside the parameter's allowed set or range.
    #[error("given param \"{param}\" value \"{value}\" is not a legal value")]
    InvalidValue {
        /// Offending parameter.
        param: Param,
        /// Rejected value.
        value: String,
    },
    /// The parameter is fixed at construction.
    #[error("param \"{0}\" is set on construction and cannot be changed")]
    Locked(Param),
}

impl ParamError {
    /// Whether this is a value validation failure (as opposed to a state violation).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyRequired(_) | Self::InvalidValue { .. })
    }
}

// --- ParamSet ---

/// Ordered, validated OMDb query parameters.
///
/// Keys are unique and keep their first insertion position. Equality and
/// hashing follow the serialized content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct ParamSet {
    /// Which required kind this set was built for.
    required: RequiredParam,
    /// Entries in insertion order.
    entries: Vec<(Param, String)>,
}

impl ParamSet {
    /// Seeds a set with the required parameter, `r=json`, `v=1`, and the optional key.
    fn seeded(
        required: RequiredParam,
        value: String,
        api_key: Option<&str>,
    ) -> Result<Self, ParamError> {
        if value.is_empty() {
            return Err(ParamError::EmptyRequired(required.param()));
        }

        let mut entries = vec![
            (required.param(), value),
            (
                Param::ReturnFormat,
                String::from(ReturnFormat::Json.wire_value()),
            ),
            (Param::Version, String::from(API_VERSION)),
        ];
        if let Some(key) = api_key {
            entries.push((Param::ApiKey, String::from(key)));
        }

        Ok(Self { required, entries })
    }

    /// Overwrites in place or appends.
    fn upsert(&mut self, param: Param, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == param) {
            entry.1 = value;
        } else {
            self.entries.push((param, value));
        }
    }

    /// The required kind this set was built for.
    #[must_use]
    pub const fn required(&self) -> RequiredParam {
        self.required
    }

    /// Current value of `param`, if set.
    #[must_use]
    pub fn get(&self, param: Param) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == param)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `param` is set.
    #[must_use]
    pub fn contains(&self, param: Param) -> bool {
        self.entries.iter().any(|(p, _)| *p == param)
    }

    /// Number of parameters set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a set carries at least its required parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Param, &str)> {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// `(wire name, value)` pairs in insertion order, ready for a query string.
    #[must_use]
    pub fn serialize(&self) -> Vec<(&'static str, String)> {
        self.entries
            .iter()
            .map(|(p, v)| (p.wire_name(), v.clone()))
            .collect()
    }
}

impl fmt::Display for ParamSet {
    /// Renders `k=v&k=v` with the access key masked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (param, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            if *param == Param::ApiKey {
                write!(f, "{param}=***")?;
            } else {
                write!(f, "{param}={value}")?;
            }
        }
        Ok(())
    }
}

// --- ParamBuilder ---

/// Constructs and mutates a `ParamSet` under the OMDb validation rules.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ParamBuilder<C = SystemClock> {
    /// Parameters accumulated so far.
    params: ParamSet,
    /// Source of the current year for the `year` check.
    clock: C,
}

impl ParamBuilder {
    /// Creates a builder around `required` using the system clock.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::EmptyRequired` if `value` is empty.
    pub fn new(
        required: RequiredParam,
        value: impl Into<String>,
        api_key: Option<&str>,
    ) -> Result<Self, ParamError> {
        Self::with_clock(required, value, api_key, SystemClock)
    }

    /// Creates a builder for a free-text search (`s`).
    ///
    /// # Errors
    ///
    /// Returns `ParamError::EmptyRequired` if `phrase` is empty.
    pub fn for_search(
        phrase: impl Into<String>,
        api_key: Option<&str>,
    ) -> Result<Self, ParamError> {
        Self::new(RequiredParam::Search, phrase, api_key)
    }

    /// Creates a builder for an exact title lookup (`t`).
    ///
    /// # Errors
    ///
    /// Returns `ParamError::EmptyRequired` if `title` is empty.
    pub fn for_title(title: impl Into<String>, api_key: Option<&str>) -> Result<Self, ParamError> {
        Self::new(RequiredParam::Title, title, api_key)
    }

    /// Creates a builder for an IMDb identifier lookup (`i`).
    ///
    /// # Errors
    ///
    /// Returns `ParamError::EmptyRequired` if `imdb_id` is empty.
    pub fn for_imdb_id(
        imdb_id: impl Into<String>,
        api_key: Option<&str>,
    ) -> Result<Self, ParamError> {
        Self::new(RequiredParam::ImdbId, imdb_id, api_key)
    }
}

impl<C: Clock> ParamBuilder<C> {
    /// Creates a builder around `required` with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::EmptyRequired` if `value` is empty.
    pub fn with_clock(
        required: RequiredParam,
        value: impl Into<String>,
        api_key: Option<&str>,
        clock: C,
    ) -> Result<Self, ParamError> {
        let params = ParamSet::seeded(required, value.into(), api_key)?;
        Ok(Self { params, clock })
    }

    /// Sets an optional parameter.
    ///
    /// An existing key keeps its position and takes the new value; a new
    /// key is appended.
    ///
    /// # Errors
    ///
    /// - `ParamError::Locked` if `param` is a required kind, `v`, or `apikey`.
    /// - `ParamError::InvalidValue` if `value` fails the parameter's check.
    pub fn add(&mut self, param: Param, value: impl Into<String>) -> Result<&mut Self, ParamError> {
        if param.is_locked() {
            return Err(ParamError::Locked(param));
        }

        let value = value.into();
        if let Some(is_valid) = validator_for(param)
            && !is_valid(&value, self.clock.current_year())
        {
            return Err(ParamError::InvalidValue { param, value });
        }

        self.params.upsert(param, value);
        Ok(self)
    }

    /// Applies `add` to each entry in order.
    ///
    /// Stops at the first failure. Entries applied before it stay applied.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `add`.
    pub fn add_all<I, V>(&mut self, entries: I) -> Result<&mut Self, ParamError>
    where
        I: IntoIterator<Item = (Param, V)>,
        V: Into<String>,
    {
        for (param, value) in entries {
            self.add(param, value)?;
        }
        Ok(self)
    }

    /// `(wire name, value)` pairs of the current set.
    #[must_use]
    pub fn serialize(&self) -> Vec<(&'static str, String)> {
        self.params.serialize()
    }

    /// Borrows the current set.
    #[must_use]
    pub const fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Consumes the builder and returns the set.
    #[must_use]
    pub fn build(self) -> ParamSet {
        self.params
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use super::*;
    use crate::omdb::clock::FixedClock;

    fn search_builder() -> ParamBuilder<FixedClock> {
        ParamBuilder::with_clock(
            RequiredParam::Search,
            "matrix",
            Some("k3y"),
            FixedClock(2024),
        )
        .unwrap()
    }

    #[test]
    fn test_wire_names_round_trip() {
        // Arrange & Act & Assert
        for param in Param::ALL {
            assert_eq!(Param::from_wire(param.wire_name()), Some(param));
        }
        assert_eq!(Param::from_wire("Y"), None);
    }

    #[test]
    fn test_construct_seeds_defaults_in_order() {
        // Arrange & Act
        let builder = search_builder();

        // Assert
        assert_eq!(
            builder.serialize(),
            vec![
                ("s", String::from("matrix")),
                ("r", String::from("json")),
                ("v", String::from("1")),
                ("apikey", String::from("k3y")),
            ]
        );
        assert_eq!(builder.params().required(), RequiredParam::Search);
    }

    #[test]
    fn test_construct_without_api_key() {
        // Arrange & Act
        let params = ParamBuilder::for_title("Alien", None).unwrap().build();

        // Assert
        assert_eq!(params.len(), 3);
        assert_eq!(params.get(Param::Title), Some("Alien"));
        assert!(!params.contains(Param::ApiKey));
    }

    #[test]
    fn test_construct_imdb_id() {
        // Arrange & Act
        let params = ParamBuilder::for_imdb_id("tt0133093", Some("k"))
            .unwrap()
            .build();

        // Assert
        assert_eq!(params.serialize()[0], ("i", String::from("tt0133093")));
    }

    #[test]
    fn test_construct_empty_required_fails() {
        // Arrange & Act
        let result = ParamBuilder::for_search("", None);

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err, ParamError::EmptyRequired(Param::Search));
        assert!(err.is_validation());
    }

    #[test]
    fn test_add_required_kind_is_state_error() {
        // Arrange
        let mut builder = search_builder();

        // Act & Assert
        for param in [Param::Search, Param::Title, Param::ImdbId] {
            let err = builder.add(param, "anything").unwrap_err();
            assert_eq!(err, ParamError::Locked(param));
            assert!(!err.is_validation());
        }
        assert_eq!(builder.params().get(Param::Search), Some("matrix"));
    }

    #[test]
    fn test_add_api_key_and_version_are_locked() {
        // Arrange
        let mut builder = search_builder();

        // Act
        let key_err = builder.add(Param::ApiKey, "other").unwrap_err();
        let version_err = builder.add(Param::Version, "2").unwrap_err();

        // Assert
        assert_eq!(key_err, ParamError::Locked(Param::ApiKey));
        assert_eq!(version_err, ParamError::Locked(Param::Version));
        assert_eq!(builder.params().get(Param::ApiKey), Some("k3y"));
        assert_eq!(builder.params().get(Param::Version), Some("1"));
    }

    #[test]
    fn test_add_type_accepts_only_closed_set() {
        // Arrange
        let mut builder = search_builder();

        // Act & Assert
        for value in TypeValue::ALL {
            assert!(builder.add(Param::Type, value.wire_value()).is_ok());
        }
        for value in ["Movie", "MOVIE", "film", "", " movie"] {
            assert_eq!(
                builder.add(Param::Type, value).unwrap_err(),
                ParamError::InvalidValue {
                    param: Param::Type,
                    value: String::from(value),
                }
            );
        }
    }

    #[test]
    fn test_add_plot_accepts_only_closed_set() {
        // Arrange
        let mut builder = search_builder();

        // Act & Assert
        assert!(builder.add(Param::Plot, "short").is_ok());
        assert!(builder.add(Param::Plot, "full").is_ok());
        assert!(builder.add(Param::Plot, "Full").is_err());
        assert!(builder.add(Param::Plot, "long").is_err());
    }

    #[test]
    fn test_add_return_format_accepts_only_closed_set() {
        // Arrange
        let mut builder = search_builder();

        // Act & Assert
        assert!(builder.add(Param::ReturnFormat, "xml").is_ok());
        assert!(builder.add(Param::ReturnFormat, "json").is_ok());
        assert!(builder.add(Param::ReturnFormat, "JSON").is_err());
        assert!(builder.add(Param::ReturnFormat, "yaml").is_err());
    }

    #[test]
    fn test_add_year_bounds() {
        // Arrange
        let mut builder = search_builder();

        // Act & Assert
        assert!(builder.add(Param::Year, "1").is_ok());
        assert!(builder.add(Param::Year, "1999").is_ok());
        assert!(builder.add(Param::Year, "2024").is_ok());
        assert!(builder.add(Param::Year, "2025").is_err());
        assert!(builder.add(Param::Year, "0").is_err());
        assert!(builder.add(Param::Year, "-5").is_err());
        assert!(builder.add(Param::Year, "nineteen").is_err());
        assert!(builder.add(Param::Year, "1999.0").is_err());
        assert!(builder.add(Param::Year, "").is_err());
    }

    #[test]
    fn test_add_year_follows_injected_clock() {
        // Arrange
        let mut early = ParamBuilder::with_clock(
            RequiredParam::Search,
            "x",
            None,
            FixedClock(1990),
        )
        .unwrap();

        // Act
        let result = early.add(Param::Year, "1999");

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_add_page_bounds() {
        // Arrange
        let mut builder = search_builder();

        // Act & Assert
        assert!(builder.add(Param::Page, "1").is_ok());
        assert!(builder.add(Param::Page, "100").is_ok());
        assert!(builder.add(Param::Page, "0").is_err());
        assert!(builder.add(Param::Page, "-1").is_err());
        assert!(builder.add(Param::Page, "two").is_err());
        assert!(builder.add(Param::Page, "99999999999").is_err());
    }

    #[test]
    fn test_add_overwrites_in_place() {
        // Arrange
        let mut builder = search_builder();
        builder
            .add(Param::Type, "movie")
            .unwrap()
            .add(Param::Year, "1999")
            .unwrap();

        // Act
        builder.add(Param::Type, "series").unwrap();

        // Assert
        let wire: Vec<&str> = builder.serialize().iter().map(|(k, _)| *k).collect();
        assert_eq!(wire, vec!["s", "r", "v", "apikey", "type", "y"]);
        assert_eq!(builder.params().get(Param::Type), Some("series"));
    }

    #[test]
    fn test_add_optional_to_title_lookup() {
        // Arrange
        let mut builder =
            ParamBuilder::with_clock(RequiredParam::Title, "Alien", None, FixedClock(2024))
                .unwrap();

        // Act
        let result = builder.add(Param::Type, "movie");

        // Assert
        assert!(result.is_ok());
        assert_eq!(builder.params().len(), 4);
    }

    #[test]
    fn test_add_all_keeps_entries_before_failure() {
        // Arrange
        let mut builder = search_builder();

        // Act
        let result = builder.add_all([
            (Param::Type, "movie"),
            (Param::Year, "3000"),
            (Param::Page, "2"),
        ]);

        // Assert
        assert_eq!(
            result.unwrap_err(),
            ParamError::InvalidValue {
                param: Param::Year,
                value: String::from("3000"),
            }
        );
        assert_eq!(builder.params().get(Param::Type), Some("movie"));
        assert!(!builder.params().contains(Param::Year));
        assert!(!builder.params().contains(Param::Page));
    }

    #[test]
    fn test_add_all_applies_in_iteration_order() {
        // Arrange
        let mut builder = search_builder();

        // Act
        builder
            .add_all(vec![
                (Param::Page, String::from("3")),
                (Param::Type, String::from("episode")),
            ])
            .unwrap();

        // Assert
        let tail: Vec<(&str, String)> = builder.serialize().into_iter().skip(4).collect();
        assert_eq!(
            tail,
            vec![("page", String::from("3")), ("type", String::from("episode"))]
        );
    }

    #[test]
    fn test_serialize_is_idempotent() {
        // Arrange
        let mut builder = search_builder();
        builder.add(Param::Plot, "full").unwrap();

        // Act
        let first = builder.serialize();
        let second = builder.serialize();

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn test_equality_follows_content() {
        // Arrange
        let mut a = search_builder();
        let mut b = search_builder();
        a.add(Param::Page, "2").unwrap();
        b.add(Param::Page, "2").unwrap();

        // Act
        let mut seen = HashSet::new();
        seen.insert(a.params().clone());

        // Assert
        assert_eq!(a.params(), b.params());
        assert!(seen.contains(b.params()));

        b.add(Param::Page, "3").unwrap();
        assert_ne!(a.params(), b.params());
    }

    #[test]
    fn test_display_masks_api_key() {
        // Arrange
        let mut builder = search_builder();
        builder.add(Param::Type, "movie").unwrap();

        // Act
        let rendered = builder.params().to_string();

        // Assert
        assert_eq!(rendered, "s=matrix&r=json&v=1&apikey=***&type=movie");
    }

    #[test]
    fn test_value_set_parsing_is_exact() {
        // Arrange & Act & Assert
        assert_eq!(TypeValue::from_wire("series"), Some(TypeValue::Series));
        assert_eq!(TypeValue::from_wire("Series"), None);
        assert_eq!(PlotValue::from_wire("short"), Some(PlotValue::Short));
        assert_eq!(ReturnFormat::from_wire("xml"), Some(ReturnFormat::Xml));
        assert_eq!(ReturnFormat::from_wire("Xml"), None);
    }
}
