#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finscore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Comparison blocks built from normalized rows.
pub mod comparative;
/// Growth, delta and CAGR primitives.
pub mod growth;

pub use comparative::{
    ANNUAL_TREND_LOOKBACK, AnnualTrend, ComparativeMetrics, PeriodComparison,
    build_comparative_metrics,
};
pub use growth::{cagr_pct, delta, growth_pct, round2};
