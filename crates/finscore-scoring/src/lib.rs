#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finscore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Quality scoring over fundamentals and comparison metrics.
//!
//! - [`score_composite`] - five-factor weighted 0-100 score with breakdown
//! - [`score_legacy`] - additive health rating and BUY/HOLD/TRIM verdict
//! - [`derive_fallback_fundamentals`] - approximate fundamentals from rows
//!
//! None of these functions fail: missing or malformed inputs fall back to
//! neutral defaults.

/// Five-factor composite score.
pub mod composite;
/// Banding curves and threshold tables.
pub mod curves;
/// Fundamentals derived from statement rows.
pub mod fallback;
/// Rule-based health score.
pub mod legacy;
/// Composite weights and label thresholds.
pub mod policy;

pub use composite::{
    Component, ComponentBreakdown, ComponentScores, CompositeScoreInput, CompositeScoreResult,
    LatestRowMargins, score_composite, score_composite_with_policy,
};
pub use curves::{BandCurve, Direction};
pub use fallback::{derive_fallback_fundamentals, dividend_growth_streak};
pub use legacy::{
    LegacyBreakdownEntry, LegacyInput, LegacyRule, LegacyScore, score_legacy,
    score_legacy_fundamentals, verdict_for,
};
pub use policy::{LabelThresholds, ScoreLabel, ScoreWeights, ScoringPolicy};
