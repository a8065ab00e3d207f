//! Five-factor weighted composite quality score.
//!
//! Each component is an average or adjusted band score in `[0, 100]`. Missing
//! inputs drop out of their average; a component with no inputs at all takes
//! its neutral default.

use finscore_core::{Fundamentals, MoatRating, NormalizedFinancialRow};
use finscore_metrics::{ComparativeMetrics, PeriodComparison, round2};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::curves::{self, clamp_score, growth_score, inverse_growth_score, whole_score};
use crate::policy::{ScoreLabel, ScoreWeights, ScoringPolicy};

/// Valuation score when P/E is missing or non-positive.
pub const NEUTRAL_VALUATION: f64 = 40.0;
/// Growth score when no growth signal is available.
pub const NEUTRAL_GROWTH: f64 = 50.0;
/// Profitability score when no profitability input is available.
pub const NEUTRAL_PROFITABILITY: f64 = 55.0;
/// Safety score when no safety input is available.
pub const NEUTRAL_SAFETY: f64 = 55.0;

/// Ratios read off the most recent statement row.
///
/// A field is `None` when its denominator is zero or the row carries none of
/// the figures it needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestRowMargins {
    /// Gross margin (%).
    pub gross_margin: Option<f64>,
    /// Operating margin (%).
    pub operating_margin: Option<f64>,
    /// Net margin (%).
    pub net_margin: Option<f64>,
    /// Free cash flow margin (%).
    pub fcf_margin: Option<f64>,
    /// Operating cash flow margin (%).
    pub ocf_margin: Option<f64>,
    /// Return on equity (%).
    pub roe: Option<f64>,
    /// Return on assets (%).
    pub roa: Option<f64>,
    /// Total liabilities over equity.
    pub debt_to_equity: Option<f64>,
    /// Total liabilities as % of assets.
    pub debt_to_assets: Option<f64>,
    /// Current assets over current liabilities.
    pub current_ratio: Option<f64>,
    /// Operating income over interest expense.
    pub interest_coverage: Option<f64>,
    /// Stock-based compensation as % of revenue.
    pub sbc_ratio: Option<f64>,
    /// Capital expenditures as % of revenue.
    pub capex_ratio: Option<f64>,
    /// Annualized revenue over total assets.
    pub asset_turnover: Option<f64>,
    /// Free cash flow over net income.
    pub fcf_conversion: Option<f64>,
}

fn when(condition: bool, value: f64) -> Option<f64> {
    (condition && value.is_finite()).then_some(value)
}

impl LatestRowMargins {
    /// Reads margins and ratios off `row`.
    #[must_use]
    pub fn from_row(row: &NormalizedFinancialRow) -> Self {
        let has_revenue = row.revenue != 0.0;
        let has_cash_flow = row.operating_cash_flow != 0.0 || row.free_cash_flow != 0.0;
        let has_assets = row.total_assets != 0.0;

        Self {
            gross_margin: when(has_revenue && row.gross_income != 0.0, row.gross_margin),
            operating_margin: when(has_revenue, row.operating_margin),
            net_margin: when(has_revenue, row.net_margin),
            fcf_margin: when(has_revenue && has_cash_flow, row.fcf_margin),
            ocf_margin: when(has_revenue && row.operating_cash_flow != 0.0, row.ocf_margin),
            roe: when(row.total_equity != 0.0, row.roe),
            roa: when(has_assets, row.roa),
            debt_to_equity: when(row.total_equity != 0.0, row.debt_to_equity),
            debt_to_assets: when(has_assets && row.total_liabilities != 0.0, row.debt_to_assets),
            current_ratio: when(row.current_liabilities != 0.0, row.current_ratio),
            interest_coverage: when(
                row.interest_expense > 0.0,
                row.operating_income / row.interest_expense,
            ),
            sbc_ratio: when(has_revenue && row.stock_based_compensation != 0.0, row.sbc_ratio),
            capex_ratio: when(has_revenue && row.capital_expenditures != 0.0, row.capex_ratio),
            asset_turnover: when(
                has_assets && has_revenue,
                row.revenue / row.total_assets * row.granularity().periods_per_year(),
            ),
            fcf_conversion: when(
                row.net_income > 0.0 && has_cash_flow,
                row.free_cash_flow / row.net_income,
            ),
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Read-only projection of everything the composite score looks at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositeScoreInput {
    /// P/E ratio.
    pub pe_ratio: Option<f64>,
    /// PEG ratio.
    pub peg_ratio: Option<f64>,
    /// Return on equity (%), curated value first.
    pub roe: Option<f64>,
    /// Debt-to-equity, curated value first.
    pub debt_to_equity: Option<f64>,
    /// Payout ratio (%).
    pub payout_ratio: Option<f64>,
    /// Moat tier.
    pub moat_rating: MoatRating,
    /// Dividend growth streak in years.
    pub dividend_growth_streak: Option<u32>,
    /// Dividend safety score (0-100).
    pub dividend_safety_score: Option<f64>,
    /// Historical volatility (%).
    pub historical_volatility: Option<f64>,
    /// Every available QoQ and YoY growth percentage (revenue, net income,
    /// EPS, free and operating cash flow).
    pub growth_signals: Vec<f64>,
    /// Stock-based compensation growth (%), YoY first.
    pub sbc_growth_pct: Option<f64>,
    /// Trailing EPS growth (%), YoY first.
    pub eps_growth_pct: Option<f64>,
    /// Latest row ratios.
    pub margins: LatestRowMargins,
}

impl CompositeScoreInput {
    /// Projects fundamentals, comparison metrics and latest-row ratios.
    #[must_use]
    pub fn new(
        fundamentals: &Fundamentals,
        metrics: &ComparativeMetrics,
        margins: &LatestRowMargins,
    ) -> Self {
        let blocks: Vec<&PeriodComparison> =
            [metrics.qoq.as_ref(), metrics.yoy.as_ref()].into_iter().flatten().collect();

        let growth_signals: Vec<f64> = blocks
            .iter()
            .flat_map(|block| {
                [
                    block.revenue_growth_pct,
                    block.net_income_growth_pct,
                    block.eps_growth_pct,
                    block.fcf_growth_pct,
                    block.ocf_growth_pct,
                ]
            })
            .filter_map(finite)
            .collect();

        Self {
            pe_ratio: finite(fundamentals.pe_ratio),
            peg_ratio: finite(fundamentals.peg_ratio),
            roe: finite(fundamentals.roe).or(margins.roe),
            debt_to_equity: finite(fundamentals.debt_to_equity).or(margins.debt_to_equity),
            payout_ratio: finite(fundamentals.payout_ratio),
            moat_rating: fundamentals.moat_rating,
            dividend_growth_streak: fundamentals.dividend_growth_streak,
            dividend_safety_score: finite(fundamentals.dividend_safety_score),
            historical_volatility: finite(fundamentals.historical_volatility),
            growth_signals,
            sbc_growth_pct: yoy_then_qoq(metrics, |block| block.sbc_growth_pct),
            eps_growth_pct: yoy_then_qoq(metrics, |block| block.eps_growth_pct),
            margins: *margins,
        }
    }
}

fn yoy_then_qoq(
    metrics: &ComparativeMetrics,
    pick: fn(&PeriodComparison) -> Option<f64>,
) -> Option<f64> {
    finite(metrics.yoy.as_ref().and_then(pick))
        .or_else(|| finite(metrics.qoq.as_ref().and_then(pick)))
}

/// A composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// Price relative to earnings and cash generation.
    Valuation,
    /// Short-horizon growth.
    Growth,
    /// Returns and margins.
    Profitability,
    /// Balance sheet and dividend safety.
    Safety,
    /// Competitive durability.
    Moat,
}

impl Component {
    /// Every component, in breakdown order.
    pub const ALL: [Self; 5] = [
        Self::Valuation,
        Self::Growth,
        Self::Profitability,
        Self::Safety,
        Self::Moat,
    ];

    /// Returns the component name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valuation => "valuation",
            Self::Growth => "growth",
            Self::Profitability => "profitability",
            Self::Safety => "safety",
            Self::Moat => "moat",
        }
    }

    /// Fixed rationale shown in the breakdown.
    #[must_use]
    pub const fn rationale(&self) -> &'static str {
        match self {
            Self::Valuation => {
                "P/E banding adjusted for PEG, free cash flow margin, net margin and EPS growth"
            }
            Self::Growth => {
                "Average of QoQ and YoY growth in revenue, earnings and cash flow, offset by SBC growth"
            }
            Self::Profitability => {
                "Average of return, margin, asset turnover and cash conversion bands"
            }
            Self::Safety => {
                "Average of leverage, liquidity, coverage, payout, dilution, capex, dividend safety and volatility bands"
            }
            Self::Moat => "Moat tier base plus dividend growth streak bonus",
        }
    }

    const fn weight(&self, weights: &ScoreWeights) -> f64 {
        match self {
            Self::Valuation => weights.valuation,
            Self::Growth => weights.growth,
            Self::Profitability => weights.profitability,
            Self::Safety => weights.safety,
            Self::Moat => weights.moat,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five sub-scores, each in `[0, 100]` and rounded to 2 decimals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Valuation sub-score.
    pub valuation: f64,
    /// Growth sub-score.
    pub growth: f64,
    /// Profitability sub-score.
    pub profitability: f64,
    /// Safety sub-score.
    pub safety: f64,
    /// Moat sub-score.
    pub moat: f64,
}

impl ComponentScores {
    /// Sub-score of `component`.
    #[must_use]
    pub const fn get(&self, component: Component) -> f64 {
        match component {
            Component::Valuation => self.valuation,
            Component::Growth => self.growth,
            Component::Profitability => self.profitability,
            Component::Safety => self.safety,
            Component::Moat => self.moat,
        }
    }
}

/// One line of the composite breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    /// Component.
    pub component: Component,
    /// Sub-score.
    pub score: f64,
    /// Weight.
    pub weight: f64,
    /// `score * weight`, rounded to 2 decimals.
    pub contribution: f64,
    /// Fixed rationale.
    pub rationale: String,
}

/// Result of the composite score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeScoreResult {
    /// `round(clamp(sum of score * weight, 0, 100))`.
    pub composite_score: u8,
    /// Label band of the composite score.
    pub label: ScoreLabel,
    /// The five sub-scores.
    pub components: ComponentScores,
    /// Weights used.
    pub weights: ScoreWeights,
    /// One entry per component, in [`Component::ALL`] order.
    pub breakdown: Vec<ComponentBreakdown>,
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Valuation sub-score.
#[must_use]
pub fn valuation_score(input: &CompositeScoreInput) -> f64 {
    let mut score = match input.pe_ratio {
        Some(pe) if pe > 0.0 => curves::PE_RATIO.score(pe),
        _ => NEUTRAL_VALUATION,
    };
    if let Some(peg) = input.peg_ratio.filter(|peg| *peg > 0.0) {
        score += curves::PEG_ADJUSTMENT.score(peg);
    }
    if let Some(margin) = input.margins.fcf_margin {
        score += curves::FCF_MARGIN_ADJUSTMENT.score(margin);
    }
    if let Some(margin) = input.margins.net_margin {
        score += curves::NET_MARGIN_ADJUSTMENT.score(margin);
    }
    if let Some(growth) = input.eps_growth_pct {
        score += curves::EPS_GROWTH_ADJUSTMENT.score(growth);
    }
    clamp_score(score)
}

/// Growth sub-score.
#[must_use]
pub fn growth_sub_score(input: &CompositeScoreInput) -> f64 {
    let scores: Vec<f64> = input.growth_signals.iter().map(|pct| growth_score(*pct)).collect();
    let base = mean(&scores).unwrap_or(NEUTRAL_GROWTH);
    match input.sbc_growth_pct {
        Some(sbc) => clamp_score((base + inverse_growth_score(sbc)) / 2.0),
        None => clamp_score(base),
    }
}

/// Profitability sub-score.
#[must_use]
pub fn profitability_score(input: &CompositeScoreInput) -> f64 {
    let m = &input.margins;
    let scores: Vec<f64> = [
        input.roe.map(|v| curves::ROE.score(v)),
        m.roa.map(|v| curves::ROA.score(v)),
        m.gross_margin.map(|v| curves::GROSS_MARGIN.score(v)),
        m.operating_margin.map(|v| curves::OPERATING_MARGIN.score(v)),
        m.net_margin.map(|v| curves::NET_MARGIN.score(v)),
        m.fcf_margin.map(|v| curves::FCF_MARGIN.score(v)),
        m.ocf_margin.map(|v| curves::OCF_MARGIN.score(v)),
        m.asset_turnover.map(|v| curves::ASSET_TURNOVER.score(v)),
        m.fcf_conversion.map(|v| curves::FCF_CONVERSION.score(v)),
    ]
    .into_iter()
    .flatten()
    .collect();
    clamp_score(mean(&scores).unwrap_or(NEUTRAL_PROFITABILITY))
}

/// Safety sub-score.
#[must_use]
pub fn safety_score(input: &CompositeScoreInput) -> f64 {
    let m = &input.margins;
    let scores: Vec<f64> = [
        input
            .debt_to_equity
            .map(|v| curves::DEBT_TO_EQUITY.score_non_negative(v)),
        m.debt_to_assets.map(|v| curves::DEBT_TO_ASSETS.score_non_negative(v)),
        m.current_ratio.map(|v| curves::CURRENT_RATIO.score(v)),
        m.interest_coverage.map(|v| curves::INTEREST_COVERAGE.score(v)),
        input.payout_ratio.map(|v| curves::PAYOUT_RATIO.score_non_negative(v)),
        m.sbc_ratio.map(|v| curves::SBC_BURDEN.score_non_negative(v)),
        m.capex_ratio.map(|v| curves::CAPEX_BURDEN.score_non_negative(v)),
        input.dividend_safety_score.map(clamp_score),
        input
            .historical_volatility
            .map(|v| curves::VOLATILITY.score_non_negative(v)),
    ]
    .into_iter()
    .flatten()
    .collect();
    clamp_score(mean(&scores).unwrap_or(NEUTRAL_SAFETY))
}

/// Moat sub-score.
#[must_use]
pub fn moat_score(input: &CompositeScoreInput) -> f64 {
    let bonus = input.dividend_growth_streak.map_or(0.0, curves::streak_bonus);
    clamp_score(curves::moat_base(input.moat_rating) + bonus)
}

/// Scores a projected input under `policy`.
#[must_use]
pub fn score_input(input: &CompositeScoreInput, policy: &ScoringPolicy) -> CompositeScoreResult {
    let components = ComponentScores {
        valuation: round2(valuation_score(input)),
        growth: round2(growth_sub_score(input)),
        profitability: round2(profitability_score(input)),
        safety: round2(safety_score(input)),
        moat: round2(moat_score(input)),
    };

    let weights = policy.weights;
    let mut total = 0.0;
    let breakdown: Vec<ComponentBreakdown> = Component::ALL
        .iter()
        .map(|component| {
            let score = components.get(*component);
            let weight = component.weight(&weights);
            total += score * weight;
            ComponentBreakdown {
                component: *component,
                score,
                weight,
                contribution: round2(score * weight),
                rationale: component.rationale().to_string(),
            }
        })
        .collect();

    let composite_score = whole_score(total);

    CompositeScoreResult {
        composite_score,
        label: policy.labels.label(composite_score),
        components,
        weights,
        breakdown,
    }
}

/// Computes the composite score under the default policy.
///
/// # Example
///
/// ```
/// use finscore_core::Fundamentals;
/// use finscore_metrics::ComparativeMetrics;
/// use finscore_scoring::{LatestRowMargins, ScoreLabel, score_composite};
///
/// // Nothing known: every component falls back to its neutral default.
/// let result = score_composite(
///     &Fundamentals::default(),
///     &ComparativeMetrics::default(),
///     &LatestRowMargins::default(),
/// );
/// assert_eq!(result.composite_score, 51);
/// assert_eq!(result.label, ScoreLabel::Watch);
/// ```
#[must_use]
pub fn score_composite(
    fundamentals: &Fundamentals,
    metrics: &ComparativeMetrics,
    margins: &LatestRowMargins,
) -> CompositeScoreResult {
    score_composite_with_policy(fundamentals, metrics, margins, &ScoringPolicy::default())
}

/// Computes the composite score under `policy`.
#[must_use]
pub fn score_composite_with_policy(
    fundamentals: &Fundamentals,
    metrics: &ComparativeMetrics,
    margins: &LatestRowMargins,
    policy: &ScoringPolicy,
) -> CompositeScoreResult {
    score_input(
        &CompositeScoreInput::new(fundamentals, metrics, margins),
        policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::LabelThresholds;
    use finscore_core::{FiscalPeriod, PeriodKey};
    use finscore_metrics::build_comparative_metrics;

    fn strong_row() -> NormalizedFinancialRow {
        let mut row = NormalizedFinancialRow::new(PeriodKey::annual(2024));
        row.revenue = 1_000.0;
        row.gross_income = 650.0;
        row.operating_income = 350.0;
        row.net_income = 280.0;
        row.operating_cash_flow = 380.0;
        row.capital_expenditures = 40.0;
        row.free_cash_flow = 340.0;
        row.interest_expense = 10.0;
        row.stock_based_compensation = 15.0;
        row.total_assets = 1_200.0;
        row.current_assets = 600.0;
        row.current_liabilities = 250.0;
        row.total_liabilities = 300.0;
        row.total_equity = 900.0;
        row.recompute_derived();
        row
    }

    fn strong_fundamentals() -> Fundamentals {
        Fundamentals {
            pe_ratio: Some(9.0),
            peg_ratio: Some(0.8),
            roe: Some(31.0),
            debt_to_equity: Some(0.2),
            payout_ratio: Some(30.0),
            moat_rating: MoatRating::Wide,
            dividend_growth_streak: Some(25),
            dividend_safety_score: Some(90.0),
            historical_volatility: Some(12.0),
            ..Fundamentals::default()
        }
    }

    fn quarter(fy: i32, fp: FiscalPeriod, scale: f64) -> NormalizedFinancialRow {
        let mut row = NormalizedFinancialRow::new(PeriodKey::new(fy, fp));
        row.revenue = 100.0 * scale;
        row.net_income = 20.0 * scale;
        row.eps = 2.0 * scale;
        row.operating_cash_flow = 30.0 * scale;
        row.free_cash_flow = 25.0 * scale;
        row.stock_based_compensation = 2.0;
        row.recompute_derived();
        row
    }

    #[test]
    fn test_neutral_defaults() {
        let input = CompositeScoreInput::default();
        assert_eq!(valuation_score(&input), NEUTRAL_VALUATION);
        assert_eq!(growth_sub_score(&input), NEUTRAL_GROWTH);
        assert_eq!(profitability_score(&input), NEUTRAL_PROFITABILITY);
        assert_eq!(safety_score(&input), NEUTRAL_SAFETY);
        assert_eq!(moat_score(&input), 55.0);

        // 40*0.2 + 50*0.2 + 55*0.25 + 55*0.2 + 55*0.15 = 51
        let result = score_input(&input, &ScoringPolicy::default());
        assert_eq!(result.composite_score, 51);
        assert_eq!(result.label, ScoreLabel::Watch);
    }

    #[test]
    fn test_strong_company_is_elite() {
        let rows = vec![
            quarter(2024, FiscalPeriod::Q2, 1.2),
            quarter(2024, FiscalPeriod::Q1, 1.1),
            quarter(2023, FiscalPeriod::Q2, 1.0),
        ];
        let metrics = build_comparative_metrics(&rows);
        let margins = LatestRowMargins::from_row(&strong_row());
        let result = score_composite(&strong_fundamentals(), &metrics, &margins);

        assert!(result.composite_score >= 85, "{result:?}");
        assert_eq!(result.label, ScoreLabel::Elite);
        assert_eq!(result.components.moat, 100.0);
    }

    #[test]
    fn test_garbage_inputs_degrade_without_failing() {
        let fundamentals = Fundamentals {
            pe_ratio: Some(-12.0),
            peg_ratio: Some(f64::NAN),
            roe: Some(-40.0),
            debt_to_equity: Some(-3.0),
            payout_ratio: Some(f64::INFINITY),
            historical_volatility: Some(95.0),
            moat_rating: MoatRating::None,
            ..Fundamentals::default()
        };
        let mut row = NormalizedFinancialRow::new(PeriodKey::annual(2024));
        row.revenue = 100.0;
        row.net_income = -80.0;
        row.total_assets = 50.0;
        row.total_liabilities = 90.0;
        row.recompute_derived();

        let result = score_composite(
            &fundamentals,
            &ComparativeMetrics::default(),
            &LatestRowMargins::from_row(&row),
        );
        assert!(result.composite_score <= 100);
        assert_eq!(result.label, ScoreLabel::Risk);
        for component in Component::ALL {
            let score = result.components.get(component);
            assert!((0.0..=100.0).contains(&score), "{component}: {score}");
        }
    }

    #[test]
    fn test_breakdown_matches_components() {
        let margins = LatestRowMargins::from_row(&strong_row());
        let result = score_composite(
            &strong_fundamentals(),
            &ComparativeMetrics::default(),
            &margins,
        );

        assert_eq!(result.breakdown.len(), 5);
        let mut total = 0.0;
        for (entry, component) in result.breakdown.iter().zip(Component::ALL) {
            assert_eq!(entry.component, component);
            assert_eq!(entry.score, result.components.get(component));
            assert_eq!(entry.rationale, component.rationale());
            total += entry.score * entry.weight;
        }
        assert_eq!(result.composite_score, total.clamp(0.0, 100.0).round() as u8);
        assert_eq!(
            result.label,
            LabelThresholds::default().label(result.composite_score)
        );
    }

    #[test]
    fn test_growth_offset_by_sbc_growth() {
        let input = CompositeScoreInput {
            growth_signals: vec![20.0, 10.0],
            sbc_growth_pct: Some(40.0),
            ..CompositeScoreInput::default()
        };
        // Signals score 80 and 65, SBC growth scores 0.
        assert_eq!(growth_sub_score(&input), 36.25);
    }

    #[test]
    fn test_from_row_skips_missing_denominators() {
        let mut row = NormalizedFinancialRow::new(PeriodKey::new(2024, FiscalPeriod::Q3));
        row.net_income = 10.0;
        row.recompute_derived();
        let margins = LatestRowMargins::from_row(&row);
        assert_eq!(margins, LatestRowMargins::default());

        let margins = LatestRowMargins::from_row(&strong_row());
        assert_eq!(margins.interest_coverage, Some(35.0));
        assert_eq!(margins.fcf_conversion, Some(340.0 / 280.0));
        assert_eq!(margins.asset_turnover, Some(1_000.0 / 1_200.0));
    }

    #[test]
    fn test_custom_policy_weights() {
        let policy = ScoringPolicy::from_json(
            r#"{"weights": {"valuation": 0.0, "growth": 0.0, "profitability": 0.0, "safety": 0.0, "moat": 1.0}}"#,
        )
        .unwrap();
        let fundamentals = Fundamentals {
            moat_rating: MoatRating::Narrow,
            dividend_growth_streak: Some(11),
            ..Fundamentals::default()
        };
        let result = score_composite_with_policy(
            &fundamentals,
            &ComparativeMetrics::default(),
            &LatestRowMargins::default(),
            &policy,
        );
        assert_eq!(result.composite_score, 80);
        assert_eq!(result.label, ScoreLabel::Strong);
    }

    fn banded_input() -> CompositeScoreInput {
        CompositeScoreInput {
            roe: Some(20.0),
            debt_to_equity: Some(0.8),
            payout_ratio: Some(50.0),
            dividend_safety_score: Some(90.0),
            margins: LatestRowMargins {
                roa: Some(5.0),
                gross_margin: Some(50.0),
                net_margin: Some(10.0),
                debt_to_assets: Some(45.0),
                current_ratio: Some(1.2),
                ..LatestRowMargins::default()
            },
            ..CompositeScoreInput::default()
        }
    }

    #[test]
    fn test_profitability_averages_available_bands() {
        // ROE 85, ROA 55, gross margin 85, net margin 70.
        assert_eq!(profitability_score(&banded_input()), 73.75);
    }

    #[test]
    fn test_safety_averages_available_bands() {
        // D/E 70, debt/assets 60, current ratio 60, payout 75, dividend safety 90.
        let mut input = banded_input();
        assert_eq!(safety_score(&input), 71.0);

        // Negative equity drops D/E to its floor of 20.
        input.debt_to_equity = Some(-1.0);
        assert_eq!(safety_score(&input), 61.0);
    }
}
