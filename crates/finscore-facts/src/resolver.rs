//! Resolution of noisy, multi-tagged fact observations into one value per period.

use chrono::{Datelike, NaiveDate};
use finscore_core::{FactBag, FiscalPeriod, FormType, Granularity, PeriodKey, RawFactObservation};
use std::collections::BTreeMap;
use tracing::debug;

use crate::concept::{Concept, unit_rank};

/// The observation kept for one period after deduplication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedFact {
    /// Reported value (always finite).
    pub value: f64,
    /// Period-end date of the winning observation.
    pub period_end: Option<NaiveDate>,
    /// Filing date of the winning observation.
    pub filed: Option<NaiveDate>,
}

impl ResolvedFact {
    /// Returns true if `self` should replace `other` for the same period key:
    /// later filing date first, then later period-end date.
    fn supersedes(&self, other: &Self) -> bool {
        (self.filed, self.period_end) > (other.filed, other.period_end)
    }
}

/// One canonical time series for a concept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedSeries {
    /// Tag the series was resolved from, `None` if nothing resolved.
    pub tag: Option<String>,
    /// Unit the series was resolved from, `None` if nothing resolved.
    pub unit: Option<String>,
    /// Best value per period key.
    pub values: BTreeMap<PeriodKey, ResolvedFact>,
}

impl ResolvedSeries {
    /// Value for `key`, if resolved.
    #[must_use]
    pub fn get(&self, key: &PeriodKey) -> Option<f64> {
        self.values.get(key).map(|fact| fact.value)
    }

    /// Number of resolved periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no period resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves raw observations into one value per [`PeriodKey`] for a single
/// granularity.
///
/// # Example
///
/// ```
/// use finscore_core::{FactBag, Granularity, PeriodKey, RawFactObservation};
/// use finscore_facts::{Concept, FactSeriesResolver};
///
/// let mut bag = FactBag::new();
/// bag.push(
///     "Revenues",
///     RawFactObservation::new(383.0, "USD")
///         .with_fiscal_year(2023)
///         .with_fiscal_period("FY")
///         .with_form("10-K"),
/// );
///
/// let series = FactSeriesResolver::new(Granularity::Annual).resolve_concept(&bag, Concept::Revenue);
/// assert_eq!(series.get(&PeriodKey::annual(2023)), Some(383.0));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FactSeriesResolver {
    granularity: Granularity,
}

impl FactSeriesResolver {
    /// Creates a resolver for `granularity`.
    #[must_use]
    pub const fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    /// The granularity this resolver selects.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Derives the period key of an observation, or `None` if it does not
    /// belong to this granularity or no fiscal year can be derived.
    #[must_use]
    pub fn period_key(&self, observation: &RawFactObservation) -> Option<PeriodKey> {
        let form = observation
            .form
            .as_deref()
            .map_or(FormType::Other, FormType::classify);
        if !self.granularity.accepts(form) {
            return None;
        }

        let fiscal_year = observation
            .fiscal_year
            .or_else(|| observation.period_end.map(|end| end.year()))?;

        let fiscal_period = match self.granularity {
            Granularity::Annual => FiscalPeriod::FY,
            Granularity::Quarterly => observation
                .fiscal_period
                .as_deref()
                .and_then(FiscalPeriod::quarter_from_code)
                .or_else(|| {
                    observation
                        .period_end
                        .and_then(|end| FiscalPeriod::quarter_from_month(end.month()))
                })?,
        };

        Some(PeriodKey::new(fiscal_year, fiscal_period))
    }

    /// Deduplicates observations of a single tag and unit into one value per
    /// period key.
    ///
    /// Non-finite or missing values are dropped before grouping. On collision
    /// the later filing wins, then the later period end; on a full tie the
    /// first observation seen is kept.
    pub fn resolve_observations<'a, I>(&self, observations: I) -> BTreeMap<PeriodKey, ResolvedFact>
    where
        I: IntoIterator<Item = &'a RawFactObservation>,
    {
        let mut resolved: BTreeMap<PeriodKey, ResolvedFact> = BTreeMap::new();

        for observation in observations {
            let Some(value) = observation.finite_value() else {
                continue;
            };
            let Some(key) = self.period_key(observation) else {
                continue;
            };

            let candidate = ResolvedFact {
                value,
                period_end: observation.period_end,
                filed: observation.filed,
            };

            match resolved.get(&key) {
                Some(existing) if !candidate.supersedes(existing) => {}
                _ => {
                    resolved.insert(key, candidate);
                }
            }
        }

        resolved
    }

    /// Resolves one tag's observations, choosing the unit that yields the most
    /// periods. Ties go to the preferred unit order, then to unit name.
    ///
    /// Returns `None` if no unit resolves a single period.
    #[must_use]
    pub fn resolve_tag(
        &self,
        observations: &[RawFactObservation],
    ) -> Option<(String, BTreeMap<PeriodKey, ResolvedFact>)> {
        let mut by_unit: BTreeMap<&str, Vec<&RawFactObservation>> = BTreeMap::new();
        for observation in observations {
            by_unit
                .entry(observation.unit.as_str())
                .or_default()
                .push(observation);
        }

        let mut best: Option<(&str, BTreeMap<PeriodKey, ResolvedFact>)> = None;
        for (unit, unit_observations) in by_unit {
            let values = self.resolve_observations(unit_observations);
            if values.is_empty() {
                continue;
            }

            let better = match &best {
                None => true,
                Some((best_unit, best_values)) => {
                    values.len() > best_values.len()
                        || (values.len() == best_values.len()
                            && unit_rank(unit) < unit_rank(best_unit))
                }
            };
            if better {
                best = Some((unit, values));
            }
        }

        best.map(|(unit, values)| (unit.to_string(), values))
    }

    /// Resolves the richest series among a ranked list of alternative tags.
    ///
    /// The tag producing the most resolved periods wins; ties go to the
    /// earlier tag in `tags`.
    #[must_use]
    pub fn resolve_tags(&self, bag: &FactBag, tags: &[&str]) -> ResolvedSeries {
        let mut best = ResolvedSeries::default();

        for tag in tags {
            let Some((unit, values)) = self.resolve_tag(bag.get(tag)) else {
                continue;
            };
            if values.len() > best.len() {
                best = ResolvedSeries {
                    tag: Some((*tag).to_string()),
                    unit: Some(unit),
                    values,
                };
            }
        }

        best
    }

    /// Resolves the series for one statement concept.
    #[must_use]
    pub fn resolve_concept(&self, bag: &FactBag, concept: Concept) -> ResolvedSeries {
        let series = self.resolve_tags(bag, concept.tags());
        if let Some(tag) = &series.tag {
            debug!(
                concept = ?concept,
                tag = %tag,
                unit = series.unit.as_deref().unwrap_or_default(),
                periods = series.len(),
                granularity = ?self.granularity,
                "Resolved concept series"
            );
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual(value: f64, fy: i32, filed: NaiveDate) -> RawFactObservation {
        RawFactObservation::new(value, "USD")
            .with_fiscal_year(fy)
            .with_fiscal_period("FY")
            .with_form("10-K")
            .with_period_end(date(fy, 12, 31))
            .with_filed(filed)
    }

    #[test]
    fn test_empty_input_is_empty_series() {
        let resolver = FactSeriesResolver::new(Granularity::Annual);
        assert!(resolver.resolve_observations(&Vec::new()).is_empty());

        let series = resolver.resolve_concept(&FactBag::new(), Concept::Revenue);
        assert!(series.is_empty());
        assert!(series.tag.is_none());
    }

    #[test]
    fn test_form_filtering() {
        let obs = vec![
            annual(100.0, 2023, date(2024, 2, 1)),
            RawFactObservation::new(30.0, "USD")
                .with_fiscal_year(2023)
                .with_fiscal_period("Q1")
                .with_form("10-Q"),
            RawFactObservation::new(99.0, "USD")
                .with_fiscal_year(2022)
                .with_form("8-K"),
        ];

        let annual_values = FactSeriesResolver::new(Granularity::Annual).resolve_observations(&obs);
        assert_eq!(annual_values.len(), 1);
        assert_eq!(annual_values[&PeriodKey::annual(2023)].value, 100.0);

        let quarterly_values =
            FactSeriesResolver::new(Granularity::Quarterly).resolve_observations(&obs);
        assert_eq!(quarterly_values.len(), 1);
        assert!(quarterly_values.contains_key(&PeriodKey::new(2023, FiscalPeriod::Q1)));
    }

    #[test]
    fn test_fiscal_year_and_quarter_inference() {
        let resolver = FactSeriesResolver::new(Granularity::Quarterly);

        let inferred = RawFactObservation::new(10.0, "USD")
            .with_form("10-Q")
            .with_period_end(date(2024, 8, 31));
        assert_eq!(
            resolver.period_key(&inferred),
            Some(PeriodKey::new(2024, FiscalPeriod::Q3))
        );

        let explicit = inferred.clone().with_fiscal_year(2025).with_fiscal_period("Q1");
        assert_eq!(
            resolver.period_key(&explicit),
            Some(PeriodKey::new(2025, FiscalPeriod::Q1))
        );

        let no_year = RawFactObservation::new(10.0, "USD")
            .with_form("10-Q")
            .with_fiscal_period("Q2");
        assert_eq!(resolver.period_key(&no_year), None);
    }

    #[test]
    fn test_annual_forces_fy() {
        let resolver = FactSeriesResolver::new(Granularity::Annual);
        let obs = RawFactObservation::new(10.0, "USD")
            .with_form("10-K")
            .with_fiscal_period("Q4")
            .with_period_end(date(2021, 6, 30));
        assert_eq!(resolver.period_key(&obs), Some(PeriodKey::annual(2021)));
    }

    #[test]
    fn test_collision_prefers_latest_filing_then_period_end() {
        let resolver = FactSeriesResolver::new(Granularity::Annual);

        // Same fiscal year reported twice: original and an amendment.
        let original = annual(100.0, 2023, date(2024, 2, 1));
        let amended = annual(105.0, 2023, date(2024, 6, 1)).with_form("10-K/A");
        let values = resolver.resolve_observations(&[amended, original.clone()]);
        assert_eq!(values[&PeriodKey::annual(2023)].value, 105.0);

        // Same filing carries the prior-year comparative: later period end wins.
        let comparative = RawFactObservation::new(90.0, "USD")
            .with_fiscal_year(2023)
            .with_form("10-K")
            .with_period_end(date(2022, 12, 31))
            .with_filed(date(2024, 2, 1));
        let values = resolver.resolve_observations(&[comparative, original]);
        assert_eq!(values[&PeriodKey::annual(2023)].value, 100.0);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let resolver = FactSeriesResolver::new(Granularity::Annual);
        let later_nan = annual(f64::NAN, 2023, date(2025, 1, 1));
        let values = resolver.resolve_observations(&[annual(100.0, 2023, date(2024, 2, 1)), later_nan]);
        assert_eq!(values[&PeriodKey::annual(2023)].value, 100.0);
    }

    #[test]
    fn test_richest_tag_wins() {
        let mut bag = FactBag::new();
        bag.push("Revenues", annual(100.0, 2020, date(2021, 2, 1)));
        for fy in 2020..=2023 {
            bag.push(
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                annual(f64::from(fy), fy, date(fy + 1, 2, 1)),
            );
        }

        let series =
            FactSeriesResolver::new(Granularity::Annual).resolve_concept(&bag, Concept::Revenue);
        assert_eq!(
            series.tag.as_deref(),
            Some("RevenueFromContractWithCustomerExcludingAssessedTax")
        );
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn test_tag_tie_goes_to_rank() {
        let mut bag = FactBag::new();
        bag.push("SalesRevenueNet", annual(7.0, 2020, date(2021, 2, 1)));
        bag.push("Revenues", annual(9.0, 2020, date(2021, 2, 1)));

        let series =
            FactSeriesResolver::new(Granularity::Annual).resolve_concept(&bag, Concept::Revenue);
        assert_eq!(series.tag.as_deref(), Some("Revenues"));
        assert_eq!(series.get(&PeriodKey::annual(2020)), Some(9.0));
    }

    #[test]
    fn test_richest_unit_wins_with_preferred_fallback() {
        let resolver = FactSeriesResolver::new(Granularity::Annual);
        let mut obs = vec![annual(1.0, 2022, date(2023, 1, 1))];
        let mut eur_2022 = annual(2.0, 2022, date(2023, 1, 1));
        eur_2022.unit = "EUR".to_string();
        let mut eur_2023 = annual(3.0, 2023, date(2024, 1, 1));
        eur_2023.unit = "EUR".to_string();
        obs.push(eur_2022);
        obs.push(eur_2023);

        let (unit, values) = resolver.resolve_tag(&obs).unwrap();
        assert_eq!(unit, "EUR");
        assert_eq!(values.len(), 2);

        obs.push(annual(4.0, 2023, date(2024, 1, 1)));
        let (unit, _) = resolver.resolve_tag(&obs).unwrap();
        assert_eq!(unit, "USD");
    }
}
