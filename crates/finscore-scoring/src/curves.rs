//! Banding curves and their threshold tables.
//!
//! Every sub-score the composite engine produces goes through one of the
//! tables below. Thresholds are listed best band first.

use finscore_core::MoatRating;

/// Which side of a threshold a value must fall on to earn the band's score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// A band matches when the value is `>=` its threshold.
    HigherIsBetter,
    /// A band matches when the value is `<=` its threshold.
    LowerIsBetter,
}

/// A monotone stepped curve: the first band whose threshold the value meets
/// sets the score, otherwise `floor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandCurve {
    /// Comparison direction.
    pub direction: Direction,
    /// `(threshold, score)` pairs, best band first.
    pub bands: &'static [(f64, f64)],
    /// Score for values that meet no band, including non-finite values.
    pub floor: f64,
}

impl BandCurve {
    /// Scores `value` against the bands.
    #[must_use]
    pub fn score(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.floor;
        }
        self.bands
            .iter()
            .find(|(threshold, _)| match self.direction {
                Direction::HigherIsBetter => value >= *threshold,
                Direction::LowerIsBetter => value <= *threshold,
            })
            .map_or(self.floor, |(_, score)| *score)
    }

    /// Like [`score`](Self::score), but negative values get the floor.
    ///
    /// Used for ratios where a negative value signals negative equity or
    /// earnings rather than a good reading.
    #[must_use]
    pub fn score_non_negative(&self, value: f64) -> f64 {
        if value < 0.0 { self.floor } else { self.score(value) }
    }
}

const fn higher(bands: &'static [(f64, f64)], floor: f64) -> BandCurve {
    BandCurve {
        direction: Direction::HigherIsBetter,
        bands,
        floor,
    }
}

const fn lower(bands: &'static [(f64, f64)], floor: f64) -> BandCurve {
    BandCurve {
        direction: Direction::LowerIsBetter,
        bands,
        floor,
    }
}

// Valuation

/// Valuation base score by P/E.
pub const PE_RATIO: BandCurve = lower(
    &[(10.0, 90.0), (15.0, 80.0), (20.0, 70.0), (25.0, 60.0), (35.0, 45.0), (50.0, 30.0)],
    15.0,
);
/// Valuation adjustment by PEG ratio (positive PEG only).
pub const PEG_ADJUSTMENT: BandCurve = lower(&[(1.0, 10.0), (1.5, 5.0), (2.5, 0.0)], -5.0);
/// Valuation adjustment by free cash flow margin (%).
pub const FCF_MARGIN_ADJUSTMENT: BandCurve = higher(&[(20.0, 5.0), (10.0, 3.0), (0.0, 0.0)], -5.0);
/// Valuation adjustment by net margin (%).
pub const NET_MARGIN_ADJUSTMENT: BandCurve = higher(&[(20.0, 5.0), (10.0, 2.0), (0.0, 0.0)], -5.0);
/// Valuation adjustment by trailing EPS growth (%).
pub const EPS_GROWTH_ADJUSTMENT: BandCurve = higher(&[(20.0, 5.0), (5.0, 2.0), (-5.0, 0.0)], -5.0);

// Profitability

/// Return on equity (%).
pub const ROE: BandCurve = higher(
    &[(25.0, 95.0), (18.0, 85.0), (12.0, 70.0), (8.0, 55.0), (0.0, 40.0)],
    20.0,
);
/// Return on assets (%).
pub const ROA: BandCurve = higher(
    &[(15.0, 95.0), (10.0, 85.0), (6.0, 70.0), (3.0, 55.0), (0.0, 40.0)],
    20.0,
);
/// Gross margin (%).
pub const GROSS_MARGIN: BandCurve = higher(
    &[(60.0, 95.0), (45.0, 85.0), (30.0, 70.0), (20.0, 55.0), (10.0, 40.0)],
    25.0,
);
/// Operating margin (%).
pub const OPERATING_MARGIN: BandCurve = higher(
    &[(30.0, 95.0), (20.0, 85.0), (12.0, 70.0), (6.0, 55.0), (0.0, 40.0)],
    20.0,
);
/// Net margin (%).
pub const NET_MARGIN: BandCurve = higher(
    &[(25.0, 95.0), (15.0, 85.0), (8.0, 70.0), (3.0, 55.0), (0.0, 40.0)],
    20.0,
);
/// Free cash flow margin (%).
pub const FCF_MARGIN: BandCurve = higher(
    &[(25.0, 95.0), (15.0, 85.0), (8.0, 70.0), (3.0, 55.0), (0.0, 40.0)],
    20.0,
);
/// Operating cash flow margin (%).
pub const OCF_MARGIN: BandCurve = higher(
    &[(30.0, 95.0), (20.0, 85.0), (12.0, 70.0), (5.0, 55.0), (0.0, 40.0)],
    20.0,
);
/// Annualized revenue over total assets.
pub const ASSET_TURNOVER: BandCurve =
    higher(&[(1.5, 90.0), (1.0, 75.0), (0.6, 60.0), (0.3, 45.0)], 35.0);
/// Free cash flow over net income.
pub const FCF_CONVERSION: BandCurve =
    higher(&[(1.2, 90.0), (0.9, 80.0), (0.6, 60.0), (0.3, 45.0)], 30.0);

// Safety

/// Total liabilities over equity.
pub const DEBT_TO_EQUITY: BandCurve = lower(
    &[(0.3, 95.0), (0.6, 85.0), (1.0, 70.0), (1.5, 55.0), (2.5, 40.0)],
    20.0,
);
/// Total liabilities as % of total assets.
pub const DEBT_TO_ASSETS: BandCurve =
    lower(&[(20.0, 95.0), (40.0, 80.0), (60.0, 60.0), (80.0, 40.0)], 20.0);
/// Current assets over current liabilities.
pub const CURRENT_RATIO: BandCurve =
    higher(&[(2.0, 90.0), (1.5, 80.0), (1.0, 60.0), (0.75, 40.0)], 25.0);
/// Operating income over interest expense.
pub const INTEREST_COVERAGE: BandCurve = higher(
    &[(15.0, 95.0), (8.0, 85.0), (4.0, 70.0), (2.0, 50.0), (1.0, 35.0)],
    15.0,
);
/// Dividend payout ratio (%).
pub const PAYOUT_RATIO: BandCurve =
    lower(&[(40.0, 90.0), (60.0, 75.0), (80.0, 55.0), (100.0, 35.0)], 20.0);
/// Stock-based compensation as % of revenue.
pub const SBC_BURDEN: BandCurve =
    lower(&[(2.0, 90.0), (5.0, 75.0), (10.0, 55.0), (20.0, 35.0)], 20.0);
/// Capital expenditures as % of revenue.
pub const CAPEX_BURDEN: BandCurve =
    lower(&[(5.0, 85.0), (10.0, 75.0), (20.0, 60.0), (35.0, 45.0)], 30.0);
/// Annualized historical volatility (%).
pub const VOLATILITY: BandCurve =
    lower(&[(15.0, 90.0), (25.0, 75.0), (35.0, 60.0), (50.0, 40.0)], 25.0);

// Fallback fundamentals

/// Dividend safety score by payout ratio (%), for derived fundamentals.
pub const DIVIDEND_SAFETY_BY_PAYOUT: BandCurve =
    lower(&[(40.0, 90.0), (60.0, 75.0), (80.0, 55.0)], 30.0);

// Growth

/// Score at zero growth on the linear growth curve.
pub const GROWTH_CURVE_MIDPOINT: f64 = 50.0;
/// Score points per percentage point of growth.
pub const GROWTH_CURVE_SLOPE: f64 = 1.5;

/// Maps a growth percentage to `50 + 1.5 * pct`, clamped to `[0, 100]`.
#[must_use]
pub fn growth_score(pct: f64) -> f64 {
    clamp_score(GROWTH_CURVE_MIDPOINT + GROWTH_CURVE_SLOPE * pct)
}

/// Inverse growth curve: faster growth scores lower.
#[must_use]
pub fn inverse_growth_score(pct: f64) -> f64 {
    clamp_score(GROWTH_CURVE_MIDPOINT - GROWTH_CURVE_SLOPE * pct)
}

// Moat

/// Moat base score for a wide moat.
pub const MOAT_WIDE: f64 = 95.0;
/// Moat base score for a narrow moat.
pub const MOAT_NARROW: f64 = 75.0;
/// Moat base score with no moat.
pub const MOAT_NONE: f64 = 45.0;
/// Moat base score when unrated.
pub const MOAT_UNKNOWN: f64 = 55.0;

/// Streak bonus bands: `(streak must exceed, bonus)`, largest first.
pub const STREAK_BONUS: &[(u32, f64)] = &[(20, 8.0), (10, 5.0), (5, 2.0)];

/// Base moat score for a tier.
#[must_use]
pub const fn moat_base(rating: MoatRating) -> f64 {
    match rating {
        MoatRating::Wide => MOAT_WIDE,
        MoatRating::Narrow => MOAT_NARROW,
        MoatRating::None => MOAT_NONE,
        MoatRating::Unknown => MOAT_UNKNOWN,
    }
}

/// Bonus for a dividend growth streak of `years`.
#[must_use]
pub fn streak_bonus(years: u32) -> f64 {
    STREAK_BONUS
        .iter()
        .find(|(min, _)| years > *min)
        .map_or(0.0, |(_, bonus)| *bonus)
}

/// Clamps to `[0, 100]`; non-finite input maps to 0.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Clamps with [`clamp_score`] and rounds to a whole 0-100 rating.
#[must_use]
pub fn whole_score(value: f64) -> u8 {
    clamp_score(value).round() as u8
}
