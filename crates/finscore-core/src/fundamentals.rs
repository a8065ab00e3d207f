//! Fundamentals snapshot, moat tiers and verdicts.
//!
//! A [`Fundamentals`] record is either curated upstream (pre-computed P/E, moat
//! tier, volatility, ...) or derived from statement rows when no curated record
//! exists. Scoring treats every field as optional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative competitive-durability tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoatRating {
    /// Durable, wide moat.
    Wide,
    /// Narrow moat.
    Narrow,
    /// No moat.
    None,
    /// Not rated.
    #[default]
    Unknown,
}

impl MoatRating {
    /// Returns the tier as an uppercase string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wide => "WIDE",
            Self::Narrow => "NARROW",
            Self::None => "NONE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MoatRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoatRating {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything unrecognised is [`MoatRating::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "WIDE" => Self::Wide,
            "NARROW" => Self::Narrow,
            "NONE" => Self::None,
            _ => Self::Unknown,
        })
    }
}

/// Three-way verdict derived from the health rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Health rating at or above the buy threshold.
    Buy,
    /// Health rating at or above the hold threshold.
    Hold,
    /// Everything else.
    Trim,
}

impl Verdict {
    /// Returns the verdict as an uppercase string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Trim => "TRIM",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a [`Fundamentals`] record came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundamentalsOrigin {
    /// Supplied by a curated fundamentals source.
    #[default]
    Curated,
    /// Approximated from normalized statement rows.
    Derived,
}

/// Fundamentals snapshot consumed by the scoring engine.
///
/// Percentages (`roe`, `payout_ratio`, `historical_volatility`) are expressed in
/// percent, e.g. `42.0` for 42%.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Price-to-earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Price/earnings-to-growth ratio.
    pub peg_ratio: Option<f64>,
    /// Return on equity (%).
    pub roe: Option<f64>,
    /// Debt-to-equity ratio.
    pub debt_to_equity: Option<f64>,
    /// Dividend payout ratio (%).
    pub payout_ratio: Option<f64>,
    /// Moat tier.
    pub moat_rating: MoatRating,
    /// Consecutive years of non-declining, positive dividends.
    pub dividend_growth_streak: Option<u32>,
    /// Dividend safety score (0-100).
    pub dividend_safety_score: Option<f64>,
    /// Annualized historical volatility (%).
    pub historical_volatility: Option<f64>,
    /// Legacy health rating (0-100), when already computed.
    pub health_rating: Option<u8>,
    /// Legacy verdict, when already computed.
    pub verdict: Option<Verdict>,
    /// Where this record came from.
    pub origin: FundamentalsOrigin,
}
