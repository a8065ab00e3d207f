//! Additive rule-based health score and BUY/HOLD/TRIM verdict.
//!
//! Rule names, order and thresholds are stable: consumers key off them.

use finscore_core::{Fundamentals, MoatRating, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::curves::whole_score;

/// Starting points.
pub const BASE_POINTS: f64 = 50.0;
/// Bonus for a wide moat.
pub const WIDE_MOAT_BONUS: f64 = 20.0;
/// Bonus for a narrow moat.
pub const NARROW_MOAT_BONUS: f64 = 10.0;
/// The dividend streak must exceed this many years to earn [`STREAK_BONUS`].
pub const STREAK_BONUS_MIN_YEARS: u32 = 10;
/// Bonus for a long dividend growth streak.
pub const STREAK_BONUS: f64 = 15.0;
/// Payout ratios (%) below this earn [`PAYOUT_BONUS`].
pub const PAYOUT_BONUS_MAX_RATIO: f64 = 60.0;
/// Bonus for a conservative payout ratio.
pub const PAYOUT_BONUS: f64 = 10.0;
/// Debt-to-equity above this incurs [`LEVERAGE_PENALTY`].
pub const LEVERAGE_PENALTY_MIN_RATIO: f64 = 1.5;
/// Penalty for high leverage.
pub const LEVERAGE_PENALTY: f64 = 15.0;
/// Minimum health rating for [`Verdict::Buy`].
pub const BUY_THRESHOLD: u8 = 80;
/// Minimum health rating for [`Verdict::Hold`].
pub const HOLD_THRESHOLD: u8 = 55;

/// Inputs of the legacy score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyInput {
    /// Moat tier.
    pub moat_rating: MoatRating,
    /// Dividend growth streak in years.
    pub dividend_growth_streak: Option<u32>,
    /// Payout ratio (%).
    pub payout_ratio: Option<f64>,
    /// Debt-to-equity ratio.
    pub debt_to_equity: Option<f64>,
}

impl From<&Fundamentals> for LegacyInput {
    fn from(f: &Fundamentals) -> Self {
        Self {
            moat_rating: f.moat_rating,
            dividend_growth_streak: f.dividend_growth_streak,
            payout_ratio: f.payout_ratio,
            debt_to_equity: f.debt_to_equity,
        }
    }
}

/// A legacy scoring rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRule {
    /// Starting points.
    Base,
    /// Moat bonus.
    Moat,
    /// Dividend growth streak bonus.
    DividendStreak,
    /// Payout ratio bonus.
    PayoutRatio,
    /// Leverage penalty.
    Leverage,
    /// Verdict mapping (no points).
    Verdict,
}

impl LegacyRule {
    /// Returns the rule name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Moat => "moat",
            Self::DividendStreak => "dividend_streak",
            Self::PayoutRatio => "payout_ratio",
            Self::Leverage => "leverage",
            Self::Verdict => "verdict",
        }
    }
}

impl fmt::Display for LegacyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the legacy breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyBreakdownEntry {
    /// Rule that produced this line.
    pub rule: LegacyRule,
    /// Points added (negative for penalties).
    pub points: f64,
    /// Human-readable rationale.
    pub rationale: String,
}

/// Result of [`score_legacy`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyScore {
    /// Raw additive score before clamping.
    pub score: f64,
    /// Score clamped to `[0, 100]` and rounded.
    pub health_rating: u8,
    /// Verdict mapped from the health rating.
    pub verdict: Verdict,
    /// Rule lines in fixed order: base, moat, dividend streak, payout ratio,
    /// leverage, verdict.
    pub breakdown: Vec<LegacyBreakdownEntry>,
}

/// Maps a health rating to a verdict.
#[must_use]
pub const fn verdict_for(health_rating: u8) -> Verdict {
    if health_rating >= BUY_THRESHOLD {
        Verdict::Buy
    } else if health_rating >= HOLD_THRESHOLD {
        Verdict::Hold
    } else {
        Verdict::Trim
    }
}

/// Computes the legacy health score. Missing inputs earn no bonus or penalty.
///
/// # Example
///
/// ```
/// use finscore_core::{MoatRating, Verdict};
/// use finscore_scoring::{LegacyInput, score_legacy};
///
/// let result = score_legacy(&LegacyInput {
///     moat_rating: MoatRating::Wide,
///     dividend_growth_streak: Some(18),
///     payout_ratio: Some(42.0),
///     debt_to_equity: Some(0.7),
/// });
/// assert_eq!(result.health_rating, 95);
/// assert_eq!(result.verdict, Verdict::Buy);
/// ```
#[must_use]
pub fn score_legacy(input: &LegacyInput) -> LegacyScore {
    let mut breakdown = Vec::with_capacity(6);
    let mut push = |rule: LegacyRule, points: f64, rationale: String| {
        breakdown.push(LegacyBreakdownEntry {
            rule,
            points,
            rationale,
        });
        points
    };

    let mut score = push(
        LegacyRule::Base,
        BASE_POINTS,
        format!("Baseline of {BASE_POINTS} points"),
    );

    let moat_points = match input.moat_rating {
        MoatRating::Wide => WIDE_MOAT_BONUS,
        MoatRating::Narrow => NARROW_MOAT_BONUS,
        MoatRating::None | MoatRating::Unknown => 0.0,
    };
    score += push(
        LegacyRule::Moat,
        moat_points,
        format!("{} moat", input.moat_rating),
    );

    let streak = input.dividend_growth_streak.unwrap_or(0);
    let streak_points = if streak > STREAK_BONUS_MIN_YEARS {
        STREAK_BONUS
    } else {
        0.0
    };
    score += push(
        LegacyRule::DividendStreak,
        streak_points,
        format!("{streak} year dividend growth streak (bonus above {STREAK_BONUS_MIN_YEARS})"),
    );

    let payout_points = match input.payout_ratio {
        Some(payout) if payout.is_finite() && payout < PAYOUT_BONUS_MAX_RATIO => PAYOUT_BONUS,
        _ => 0.0,
    };
    let payout_rationale = match input.payout_ratio {
        Some(payout) if payout.is_finite() => {
            format!("Payout ratio {payout:.1}% (bonus below {PAYOUT_BONUS_MAX_RATIO}%)")
        }
        _ => "Payout ratio unavailable".to_string(),
    };
    score += push(LegacyRule::PayoutRatio, payout_points, payout_rationale);

    let leverage_points = match input.debt_to_equity {
        Some(de) if de.is_finite() && de > LEVERAGE_PENALTY_MIN_RATIO => -LEVERAGE_PENALTY,
        _ => 0.0,
    };
    let leverage_rationale = match input.debt_to_equity {
        Some(de) if de.is_finite() => {
            format!("Debt/equity {de:.2} (penalty above {LEVERAGE_PENALTY_MIN_RATIO})")
        }
        _ => "Debt/equity unavailable".to_string(),
    };
    score += push(LegacyRule::Leverage, leverage_points, leverage_rationale);

    let health_rating = whole_score(score);
    let verdict = verdict_for(health_rating);
    push(
        LegacyRule::Verdict,
        0.0,
        format!("Health rating {health_rating} maps to {verdict}"),
    );

    LegacyScore {
        score,
        health_rating,
        verdict,
        breakdown,
    }
}

/// Convenience wrapper over [`score_legacy`] for a fundamentals record.
#[must_use]
pub fn score_legacy_fundamentals(fundamentals: &Fundamentals) -> LegacyScore {
    score_legacy(&LegacyInput::from(fundamentals))
}
