//! Quarter-over-quarter, year-over-year and annual-trend comparison blocks.

use finscore_core::{NormalizedFinancialRow, PeriodKey};
use serde::{Deserialize, Serialize};

use crate::growth::{cagr_pct, delta, growth_pct};

/// Number of annual rows the trend window reaches back from the latest row.
pub const ANNUAL_TREND_LOOKBACK: usize = 4;

/// Growth and margin changes between a latest row and its comparison partner.
///
/// Growth fields are percentages; margin deltas are percentage points. Every
/// field is `None` when the baseline is zero or an input is not finite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    /// Period of the latest row.
    pub latest: PeriodKey,
    /// Period of the comparison partner.
    pub prior: PeriodKey,
    /// Revenue growth (%).
    pub revenue_growth_pct: Option<f64>,
    /// Net income growth (%).
    pub net_income_growth_pct: Option<f64>,
    /// EPS growth (%).
    pub eps_growth_pct: Option<f64>,
    /// Free cash flow growth (%).
    pub fcf_growth_pct: Option<f64>,
    /// Operating cash flow growth (%).
    pub ocf_growth_pct: Option<f64>,
    /// Stock-based compensation growth (%).
    pub sbc_growth_pct: Option<f64>,
    /// Gross margin change (pp).
    pub gross_margin_delta: Option<f64>,
    /// Operating margin change (pp).
    pub operating_margin_delta: Option<f64>,
    /// Net margin change (pp).
    pub net_margin_delta: Option<f64>,
    /// Free cash flow margin change (pp).
    pub fcf_margin_delta: Option<f64>,
}

impl PeriodComparison {
    /// Compares `latest` against `prior`.
    #[must_use]
    pub fn between(latest: &NormalizedFinancialRow, prior: &NormalizedFinancialRow) -> Self {
        Self {
            latest: latest.key(),
            prior: prior.key(),
            revenue_growth_pct: growth_pct(latest.revenue, prior.revenue),
            net_income_growth_pct: growth_pct(latest.net_income, prior.net_income),
            eps_growth_pct: growth_pct(latest.eps, prior.eps),
            fcf_growth_pct: growth_pct(latest.free_cash_flow, prior.free_cash_flow),
            ocf_growth_pct: growth_pct(latest.operating_cash_flow, prior.operating_cash_flow),
            sbc_growth_pct: growth_pct(
                latest.stock_based_compensation,
                prior.stock_based_compensation,
            ),
            gross_margin_delta: delta(latest.gross_margin, prior.gross_margin),
            operating_margin_delta: delta(latest.operating_margin, prior.operating_margin),
            net_margin_delta: delta(latest.net_margin, prior.net_margin),
            fcf_margin_delta: delta(latest.fcf_margin, prior.fcf_margin),
        }
    }
}

/// Compound annual growth between the latest annual row and a base row up to
/// [`ANNUAL_TREND_LOOKBACK`] rows earlier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnualTrend {
    /// Fiscal year of the base row.
    pub start: i32,
    /// Fiscal year of the latest row.
    pub end: i32,
    /// `end - start`.
    pub years: i32,
    /// Revenue CAGR (%).
    pub revenue_cagr_pct: Option<f64>,
    /// Net income CAGR (%).
    pub net_income_cagr_pct: Option<f64>,
    /// EPS CAGR (%).
    pub eps_cagr_pct: Option<f64>,
    /// Free cash flow CAGR (%).
    pub fcf_cagr_pct: Option<f64>,
}

impl AnnualTrend {
    /// Builds the trend from annual rows, in any order.
    ///
    /// `None` when fewer than two annual rows are given. The window is not
    /// normalized: with fewer than five rows it spans from the earliest row.
    #[must_use]
    pub fn from_annual_rows(rows: &[&NormalizedFinancialRow]) -> Option<Self> {
        if rows.len() < 2 {
            return None;
        }

        let mut ascending = rows.to_vec();
        ascending.sort_by_key(|row| row.key());

        let latest = ascending[ascending.len() - 1];
        let base = ascending[ascending
            .len()
            .saturating_sub(ANNUAL_TREND_LOOKBACK + 1)];
        let years = latest.fiscal_year - base.fiscal_year;

        Some(Self {
            start: base.fiscal_year,
            end: latest.fiscal_year,
            years,
            revenue_cagr_pct: cagr_pct(latest.revenue, base.revenue, years),
            net_income_cagr_pct: cagr_pct(latest.net_income, base.net_income, years),
            eps_cagr_pct: cagr_pct(latest.eps, base.eps, years),
            fcf_cagr_pct: cagr_pct(latest.free_cash_flow, base.free_cash_flow, years),
        })
    }
}

/// The three optional comparison blocks for one symbol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparativeMetrics {
    /// Latest quarter against the quarter before it.
    pub qoq: Option<PeriodComparison>,
    /// Latest quarter against the same quarter a year earlier.
    pub yoy: Option<PeriodComparison>,
    /// Multi-year compound growth over annual rows.
    pub annual_trend: Option<AnnualTrend>,
}

impl ComparativeMetrics {
    /// Returns true if no block could be built.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.qoq.is_none() && self.yoy.is_none() && self.annual_trend.is_none()
    }
}

/// Builds comparison blocks from rows sorted most recent first.
///
/// `rows` may mix annual and quarterly rows; each block only looks at the
/// granularity it needs.
///
/// # Example
///
/// ```
/// use finscore_core::{FiscalPeriod, NormalizedFinancialRow, PeriodKey};
/// use finscore_metrics::build_comparative_metrics;
///
/// let mut q2 = NormalizedFinancialRow::new(PeriodKey::new(2024, FiscalPeriod::Q2));
/// q2.revenue = 120.0;
/// let mut q1 = NormalizedFinancialRow::new(PeriodKey::new(2024, FiscalPeriod::Q1));
/// q1.revenue = 100.0;
///
/// let metrics = build_comparative_metrics(&[q2, q1]);
/// assert_eq!(metrics.qoq.unwrap().revenue_growth_pct, Some(20.0));
/// assert!(metrics.yoy.is_none());
/// ```
#[must_use]
pub fn build_comparative_metrics(rows: &[NormalizedFinancialRow]) -> ComparativeMetrics {
    let quarters: Vec<&NormalizedFinancialRow> =
        rows.iter().filter(|row| row.fiscal_period.is_quarter()).collect();
    let annuals: Vec<&NormalizedFinancialRow> =
        rows.iter().filter(|row| !row.fiscal_period.is_quarter()).collect();

    let qoq = match quarters.as_slice() {
        [latest, prior, ..] => Some(PeriodComparison::between(latest, prior)),
        _ => None,
    };

    let yoy = quarters.first().and_then(|latest| {
        let target = latest.key().year_ago();
        quarters
            .iter()
            .find(|row| row.key() == target)
            .map(|prior| PeriodComparison::between(latest, prior))
    });

    ComparativeMetrics {
        qoq,
        yoy,
        annual_trend: AnnualTrend::from_annual_rows(&annuals),
    }
}
