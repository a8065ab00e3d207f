//! Normalization of SEC EDGAR company-facts documents into a [`FactBag`].
//!
//! The document shape is `facts -> taxonomy -> tag -> units -> unit -> [fact]`.
//! Fetching the document is the caller's business; this module only turns the
//! JSON into observations.

use chrono::NaiveDate;
use finscore_core::{FactBag, RawFactObservation, Result, ScoreError};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Taxonomy whose tags take precedence when the same tag appears twice.
const PRIMARY_TAXONOMY: &str = "us-gaap";

/// Company-facts document as returned by the EDGAR XBRL API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFacts {
    /// Entity name.
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Facts organized by taxonomy and tag.
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, TagFacts>>,
}

/// Facts for a specific XBRL tag.
#[derive(Debug, Deserialize)]
pub struct TagFacts {
    /// Units (USD, shares, etc.) containing the actual fact values.
    #[serde(default)]
    pub units: Option<HashMap<String, Vec<FactValue>>>,
}

/// A single fact value with metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct FactValue {
    /// End date of the period.
    #[serde(default)]
    pub end: Option<String>,
    /// Value.
    #[serde(default)]
    pub val: Option<f64>,
    /// Fiscal year.
    #[serde(default)]
    pub fy: Option<i32>,
    /// Fiscal period.
    #[serde(default)]
    pub fp: Option<String>,
    /// Form type.
    #[serde(default)]
    pub form: Option<String>,
    /// Filed date.
    #[serde(default)]
    pub filed: Option<String>,
}

impl FactValue {
    fn into_observation(self, unit: &str) -> RawFactObservation {
        RawFactObservation {
            value: self.val,
            period_end: self.end.as_deref().and_then(parse_date),
            fiscal_year: self.fy,
            fiscal_period: self.fp,
            form: self.form,
            filed: self.filed.as_deref().and_then(parse_date),
            unit: unit.to_string(),
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

impl CompanyFacts {
    /// Flattens the document into a [`FactBag`] keyed by tag.
    ///
    /// `us-gaap` tags are taken first; a tag from another taxonomy is only
    /// added if no `us-gaap` tag of the same name exists.
    #[must_use]
    pub fn into_fact_bag(mut self) -> FactBag {
        let mut bag = FactBag::new();

        let mut taxonomies: Vec<(String, HashMap<String, TagFacts>)> = Vec::new();
        if let Some(primary) = self.facts.remove(PRIMARY_TAXONOMY) {
            taxonomies.push((PRIMARY_TAXONOMY.to_string(), primary));
        }
        let mut rest: Vec<_> = self.facts.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));
        taxonomies.extend(rest);

        for (_, tags) in taxonomies {
            for (tag, tag_facts) in tags {
                if bag.contains_tag(&tag) {
                    continue;
                }
                let Some(units) = tag_facts.units else {
                    continue;
                };
                for (unit, values) in units {
                    bag.extend(
                        tag.clone(),
                        values.into_iter().map(|v| v.into_observation(&unit)),
                    );
                }
            }
        }

        debug!(
            entity = self.entity_name.as_deref().unwrap_or("unknown"),
            observations = bag.len(),
            "Normalized company facts"
        );

        bag
    }
}

/// Parses a company-facts JSON document into a [`FactBag`].
///
/// # Errors
/// Returns [`ScoreError::Parse`] if the document is not valid company-facts JSON.
pub fn parse_company_facts(json: &str) -> Result<FactBag> {
    let facts: CompanyFacts = serde_json::from_str(json)
        .map_err(|e| ScoreError::Parse(format!("Failed to parse company facts: {}", e)))?;
    Ok(facts.into_fact_bag())
}
