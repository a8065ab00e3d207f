//! Assembly of resolved concept series into normalized statement rows.

use finscore_core::{
    FactBag, FormType, Granularity, NormalizedFinancialRow, PeriodKey, RawFactObservation,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::concept::Concept;
use crate::resolver::{FactSeriesResolver, ResolvedSeries};

/// Resolved series for every concept of one granularity.
pub type ConceptSeries = BTreeMap<Concept, ResolvedSeries>;

/// Builds sorted [`NormalizedFinancialRow`]s from a fact bag.
#[derive(Clone, Copy, Debug)]
pub struct StatementRowBuilder {
    resolver: FactSeriesResolver,
}

impl StatementRowBuilder {
    /// Creates a builder for `granularity`.
    #[must_use]
    pub const fn new(granularity: Granularity) -> Self {
        Self {
            resolver: FactSeriesResolver::new(granularity),
        }
    }

    /// Resolves the series of every [`Concept`].
    #[must_use]
    pub fn resolve_all(&self, bag: &FactBag) -> ConceptSeries {
        Concept::ALL
            .iter()
            .map(|concept| (*concept, self.resolver.resolve_concept(bag, *concept)))
            .collect()
    }

    /// Resolves `bag` and builds rows, most recent first.
    #[must_use]
    pub fn build(&self, bag: &FactBag) -> Vec<NormalizedFinancialRow> {
        self.build_from_series(&self.resolve_all(bag))
    }

    /// Builds rows from already resolved concept series, most recent first.
    ///
    /// Every period key seen in any series gets one row. Rows whose revenue,
    /// net income and total assets are all zero are dropped.
    #[must_use]
    pub fn build_from_series(&self, series: &ConceptSeries) -> Vec<NormalizedFinancialRow> {
        let keys: BTreeSet<PeriodKey> = series
            .values()
            .flat_map(|s| s.values.keys().copied())
            .collect();

        let mut rows = Vec::with_capacity(keys.len());
        let mut placeholders = 0usize;

        for key in keys {
            let row = build_row(key, series);
            if row.is_placeholder() {
                placeholders += 1;
                continue;
            }
            rows.push(row);
        }

        sort_rows(&mut rows);

        debug!(
            granularity = ?self.resolver.granularity(),
            rows = rows.len(),
            placeholders,
            "Built statement rows"
        );

        rows
    }
}

fn build_row(key: PeriodKey, series: &ConceptSeries) -> NormalizedFinancialRow {
    let mut row = NormalizedFinancialRow::new(key);
    let value = |concept: Concept| series.get(&concept).and_then(|s| s.get(&key));

    for (concept, concept_series) in series {
        if let Some(fact) = concept_series.values.get(&key) {
            concept.apply(&mut row, fact.value);
            if fact.period_end > row.period_end {
                row.period_end = fact.period_end;
            }
        }
    }

    if value(Concept::GrossProfit).is_none()
        && let (Some(revenue), Some(cost)) =
            (value(Concept::Revenue), value(Concept::CostOfRevenue))
    {
        row.gross_income = revenue - cost;
    }

    if let Some(ocf) = value(Concept::OperatingCashFlow) {
        row.free_cash_flow = ocf - row.capital_expenditures.abs();
    }

    row.recompute_derived();
    row
}

/// Sorts rows most recent first: descending fiscal year, then descending
/// fiscal period rank (`Q4 > Q3 > Q2 > Q1 > FY`).
pub fn sort_rows(rows: &mut [NormalizedFinancialRow]) {
    rows.sort_by(|a, b| b.key().cmp(&a.key()));
}

/// Resolves `bag` at `granularity` and builds rows, most recent first.
///
/// # Example
///
/// ```
/// use finscore_core::{FactBag, Granularity, RawFactObservation};
/// use finscore_facts::build_statement_rows;
///
/// let mut bag = FactBag::new();
/// for (fy, revenue) in [(2022, 90.0), (2023, 100.0)] {
///     bag.push(
///         "Revenues",
///         RawFactObservation::new(revenue, "USD")
///             .with_fiscal_year(fy)
///             .with_form("10-K"),
///     );
/// }
///
/// let rows = build_statement_rows(&bag, Granularity::Annual);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].fiscal_year, 2023);
/// ```
#[must_use]
pub fn build_statement_rows(bag: &FactBag, granularity: Granularity) -> Vec<NormalizedFinancialRow> {
    StatementRowBuilder::new(granularity).build(bag)
}

/// Re-expresses rows as raw observations, one per non-zero base field, under
/// each concept's primary tag.
///
/// Gross profit is written even when zero if revenue or cost of revenue is
/// present, so a reported zero is not replaced by the revenue minus cost
/// fallback on rebuild. Building rows from the result yields the original rows.
#[must_use]
pub fn rows_to_fact_bag(rows: &[NormalizedFinancialRow]) -> FactBag {
    let mut bag = FactBag::new();

    for row in rows {
        let form = FormType::canonical(row.granularity());
        let has_gross_inputs = row.revenue != 0.0 || row.cost_of_revenue != 0.0;
        for concept in Concept::ALL {
            let value = concept.read(row);
            let keep_zero = concept == Concept::GrossProfit && has_gross_inputs;
            if !value.is_finite() || (value == 0.0 && !keep_zero) {
                continue;
            }

            let mut observation = RawFactObservation::new(value, concept.unit())
                .with_fiscal_year(row.fiscal_year)
                .with_fiscal_period(row.fiscal_period.as_str())
                .with_form(form);
            if let Some(period_end) = row.period_end {
                observation = observation.with_period_end(period_end).with_filed(period_end);
            }
            bag.push(concept.primary_tag(), observation);
        }
    }

    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finscore_core::FiscalPeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual(value: f64, fy: i32) -> RawFactObservation {
        RawFactObservation::new(value, "USD")
            .with_fiscal_year(fy)
            .with_fiscal_period("FY")
            .with_form("10-K")
            .with_period_end(date(fy, 12, 31))
            .with_filed(date(fy + 1, 2, 15))
    }

    fn quarter(value: f64, fy: i32, fp: &str, end: NaiveDate) -> RawFactObservation {
        RawFactObservation::new(value, "USD")
            .with_fiscal_year(fy)
            .with_fiscal_period(fp)
            .with_form("10-Q")
            .with_period_end(end)
            .with_filed(end)
    }

    fn sample_bag() -> FactBag {
        let mut bag = FactBag::new();
        for (fy, revenue, net, ocf, capex) in [
            (2021, 1_000.0, 100.0, 180.0, -40.0),
            (2022, 1_100.0, 120.0, 200.0, -50.0),
            (2023, 1_250.0, 150.0, 240.0, 60.0),
        ] {
            bag.push("Revenues", annual(revenue, fy));
            bag.push("CostOfRevenue", annual(revenue * 0.6, fy));
            bag.push("OperatingIncomeLoss", annual(net * 1.4, fy));
            bag.push("NetIncomeLoss", annual(net, fy));
            bag.push("NetCashProvidedByUsedInOperatingActivities", annual(ocf, fy));
            bag.push("PaymentsToAcquirePropertyPlantAndEquipment", annual(capex, fy));
            bag.push("Assets", annual(revenue * 2.0, fy));
            bag.push("Liabilities", annual(revenue, fy));
            bag.push("StockholdersEquity", annual(revenue, fy));
            let mut eps = annual(net / 100.0, fy);
            eps.unit = "USD/shares".to_string();
            bag.push("EarningsPerShareDiluted", eps);
        }
        bag
    }

    #[test]
    fn test_build_annual_rows() {
        let rows = build_statement_rows(&sample_bag(), Granularity::Annual);
        assert_eq!(rows.len(), 3);

        let latest = &rows[0];
        assert_eq!(latest.key(), PeriodKey::annual(2023));
        assert_eq!(latest.period_end, Some(date(2023, 12, 31)));
        assert_eq!(latest.capital_expenditures, 60.0);
        assert_eq!(latest.free_cash_flow, 180.0);
        assert_eq!(latest.gross_income, 500.0);
        assert_eq!(latest.gross_margin, 40.0);
        assert_eq!(latest.net_margin, 12.0);
        assert_eq!(latest.debt_to_assets, 50.0);
        assert_eq!(latest.eps, 1.5);

        // Negative capex sign convention is normalized away.
        assert_eq!(rows[1].capital_expenditures, 50.0);
        assert_eq!(rows[1].free_cash_flow, 150.0);
    }

    #[test]
    fn test_quarterly_ignores_annual_facts() {
        assert!(build_statement_rows(&sample_bag(), Granularity::Quarterly).is_empty());
    }

    #[test]
    fn test_sort_order_most_recent_first() {
        let mut bag = FactBag::new();
        bag.push("Revenues", quarter(10.0, 2023, "Q4", date(2023, 12, 31)));
        bag.push("Revenues", quarter(11.0, 2024, "Q1", date(2024, 3, 31)));
        bag.push("Revenues", quarter(12.0, 2024, "Q3", date(2024, 9, 30)));
        bag.push("Revenues", quarter(13.0, 2024, "Q2", date(2024, 6, 30)));

        let rows = build_statement_rows(&bag, Granularity::Quarterly);
        let keys: Vec<PeriodKey> = rows.iter().map(NormalizedFinancialRow::key).collect();
        assert_eq!(
            keys,
            vec![
                PeriodKey::new(2024, FiscalPeriod::Q3),
                PeriodKey::new(2024, FiscalPeriod::Q2),
                PeriodKey::new(2024, FiscalPeriod::Q1),
                PeriodKey::new(2023, FiscalPeriod::Q4),
            ]
        );
    }

    #[test]
    fn test_placeholder_rows_discarded() {
        let mut bag = FactBag::new();
        bag.push("Revenues", annual(100.0, 2023));
        // Only a cash figure for 2022: revenue, net income and assets all zero.
        bag.push("CashAndCashEquivalentsAtCarryingValue", annual(5.0, 2022));

        let rows = build_statement_rows(&bag, Granularity::Annual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fiscal_year, 2023);
    }

    #[test]
    fn test_free_cash_flow_kept_without_operating_cash_flow() {
        let mut bag = FactBag::new();
        bag.push("Revenues", annual(100.0, 2023));
        bag.push("FreeCashFlow", annual(30.0, 2023));
        bag.push("PaymentsToAcquirePropertyPlantAndEquipment", annual(10.0, 2023));

        let rows = build_statement_rows(&bag, Granularity::Annual);
        assert_eq!(rows[0].free_cash_flow, 30.0);
        assert_eq!(rows[0].fcf_margin, 30.0);
    }

    #[test]
    fn test_reported_gross_profit_wins_over_fallback() {
        let mut bag = FactBag::new();
        bag.push("Revenues", annual(100.0, 2023));
        bag.push("CostOfRevenue", annual(70.0, 2023));
        bag.push("GrossProfit", annual(35.0, 2023));

        let rows = build_statement_rows(&bag, Granularity::Annual);
        assert_eq!(rows[0].gross_income, 35.0);
    }

    #[test]
    fn test_rebuild_from_own_rows_is_stable() {
        let mut bag = sample_bag();
        bag.push("Revenues", quarter(300.0, 2024, "Q1", date(2024, 3, 31)));
        bag.push("NetIncomeLoss", quarter(40.0, 2024, "Q1", date(2024, 3, 31)));
        bag.push("Assets", quarter(2_600.0, 2024, "Q1", date(2024, 3, 31)));
        bag.push("FreeCashFlow", quarter(25.0, 2024, "Q1", date(2024, 3, 31)));

        for granularity in [Granularity::Annual, Granularity::Quarterly] {
            let rows = build_statement_rows(&bag, granularity);
            assert!(!rows.is_empty());

            let rebuilt = build_statement_rows(&rows_to_fact_bag(&rows), granularity);
            assert_eq!(rebuilt, rows);
        }
    }

    #[test]
    fn test_rebuild_keeps_reported_zero_gross_profit() {
        let mut bag = FactBag::new();
        bag.push("Revenues", annual(100.0, 2023));
        bag.push("CostOfRevenue", annual(60.0, 2023));
        bag.push("GrossProfit", annual(0.0, 2023));

        let rows = build_statement_rows(&bag, Granularity::Annual);
        assert_eq!(rows[0].gross_income, 0.0);

        let rebuilt = build_statement_rows(&rows_to_fact_bag(&rows), Granularity::Annual);
        assert_eq!(rebuilt[0].gross_income, 0.0);
        assert_eq!(rebuilt, rows);

        // Without a reported gross profit the fallback survives the rebuild too.
        let mut bag = FactBag::new();
        bag.push("Revenues", annual(100.0, 2023));
        bag.push("CostOfRevenue", annual(60.0, 2023));
        let rows = build_statement_rows(&bag, Granularity::Annual);
        assert_eq!(rows[0].gross_income, 40.0);
        assert_eq!(build_statement_rows(&rows_to_fact_bag(&rows), Granularity::Annual), rows);
    }
}
