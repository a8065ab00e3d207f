//! Core data types for raw filing facts.
//!
//! This module defines the input shapes consumed by fact resolution:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`RawFactObservation`] - One reported value for one concept at one point in time
//! - [`FactBag`] - Observations grouped by the tag they were reported under

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One reported value for one concept at one point in time.
///
/// Every attribute except the unit may be absent in upstream data; resolution
/// decides what to do with incomplete observations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFactObservation {
    /// Reported value. Missing or non-finite values are dropped during resolution.
    pub value: Option<f64>,
    /// End date of the reported period.
    pub period_end: Option<NaiveDate>,
    /// Reported fiscal year.
    pub fiscal_year: Option<i32>,
    /// Reported fiscal period code (`Q1`..`Q4`, `FY`, or anything else upstream emits).
    pub fiscal_period: Option<String>,
    /// Originating form type (e.g. `10-K`, `10-Q`).
    pub form: Option<String>,
    /// Filing date.
    pub filed: Option<NaiveDate>,
    /// Unit of measure (e.g. `USD`, `USD/shares`, `shares`).
    pub unit: String,
}

impl RawFactObservation {
    /// Creates an observation with a value and unit; every other attribute is absent.
    #[must_use]
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            unit: unit.into(),
            ..Default::default()
        }
    }

    /// Sets the period-end date.
    #[must_use]
    pub const fn with_period_end(mut self, period_end: NaiveDate) -> Self {
        self.period_end = Some(period_end);
        self
    }

    /// Sets the reported fiscal year.
    #[must_use]
    pub const fn with_fiscal_year(mut self, fiscal_year: i32) -> Self {
        self.fiscal_year = Some(fiscal_year);
        self
    }

    /// Sets the reported fiscal period code.
    #[must_use]
    pub fn with_fiscal_period(mut self, fiscal_period: impl Into<String>) -> Self {
        self.fiscal_period = Some(fiscal_period.into());
        self
    }

    /// Sets the originating form type.
    #[must_use]
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Sets the filing date.
    #[must_use]
    pub const fn with_filed(mut self, filed: NaiveDate) -> Self {
        self.filed = Some(filed);
        self
    }

    /// Returns the value if it is present and finite.
    #[must_use]
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

/// Raw observations grouped by the tag they were reported under.
///
/// Tags are kept in a `BTreeMap` so iteration order, and therefore resolution,
/// is deterministic for a fixed input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactBag {
    facts: BTreeMap<String, Vec<RawFactObservation>>,
}

impl FactBag {
    /// Creates an empty fact bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }

    /// Adds one observation under `tag`.
    pub fn push(&mut self, tag: impl Into<String>, observation: RawFactObservation) {
        self.facts.entry(tag.into()).or_default().push(observation);
    }

    /// Adds several observations under `tag`.
    pub fn extend<I>(&mut self, tag: impl Into<String>, observations: I)
    where
        I: IntoIterator<Item = RawFactObservation>,
    {
        self.facts
            .entry(tag.into())
            .or_default()
            .extend(observations);
    }

    /// Observations reported under `tag` (empty if the tag is absent).
    #[must_use]
    pub fn get(&self, tag: &str) -> &[RawFactObservation] {
        self.facts.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if `tag` has at least one observation.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.facts.get(tag).is_some_and(|obs| !obs.is_empty())
    }

    /// Iterates over tag names.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.facts.keys().map(String::as_str)
    }

    /// Total number of observations across all tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.values().map(Vec::len).sum()
    }

    /// Returns true if there are no observations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.values().all(Vec::is_empty)
    }
}
