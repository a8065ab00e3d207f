#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finscore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for fundamentals normalization and scoring.
//!
//! This crate provides the shared vocabulary used by every other crate in the
//! workspace:
//!
//! - [`RawFactObservation`](types::RawFactObservation) / [`FactBag`](types::FactBag) - raw tagged facts
//! - [`PeriodKey`](period::PeriodKey) - `(fiscal year, fiscal period)` identity
//! - [`NormalizedFinancialRow`](row::NormalizedFinancialRow) - one statement line per period
//! - [`Fundamentals`](fundamentals::Fundamentals) - curated or derived fundamentals snapshot
//! - [`FactSource`](source::FactSource) / [`FactStore`](source::FactStore) - upstream collaborators

/// Error types for source, store and parse operations.
pub mod error;
/// Fundamentals snapshot, moat tiers and verdicts.
pub mod fundamentals;
/// Granularity, fiscal period and period key definitions.
pub mod period;
/// Normalized financial statement rows.
pub mod row;
/// Source and store traits for raw facts, quotes and curated fundamentals.
pub mod source;
/// Core data types (Symbol, raw observations, fact bags).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{Result, ScoreError};
pub use fundamentals::{Fundamentals, FundamentalsOrigin, MoatRating, Verdict};
pub use period::{FiscalPeriod, FormType, Granularity, PeriodKey};
pub use row::{NormalizedFinancialRow, pct_of, ratio_of};
pub use source::{FactSource, FactStore, FundamentalsSource, QuoteSource};
pub use types::{FactBag, RawFactObservation, Symbol};
