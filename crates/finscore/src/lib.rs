#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finscore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fundamentals normalization, comparison metrics and quality scoring.
//!
//! This crate re-exports the pipeline crates and provides an [`Analyzer`]
//! that runs them end to end over pluggable sources, trying fact sources in
//! order until one has data.
//!
//! # Features
//!
//! - `store-sqlite` - SQLite-backed statement store (on by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use finscore::{Analyzer, SqliteStore, StoreFactSource, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> finscore::Result<()> {
//!     let store = Arc::new(SqliteStore::new("statements.db")?);
//!     let analyzer = Analyzer::new().with_source(Arc::new(StoreFactSource::new(store)));
//!
//!     let analysis = analyzer.analyze(&Symbol::new("KO")).await?;
//!     println!("{:?}", analysis.composite);
//!     println!("{}", analysis.to_frame()?);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use finscore_core::*;

// Fact resolution and row building
pub use finscore_facts::{
    CompanyFacts, Concept, ConceptSeries, FactSeriesResolver, ResolvedFact, ResolvedSeries,
    StatementRowBuilder, build_statement_rows, parse_company_facts, rows_to_fact_bag, sort_rows,
};

// Comparison metrics
pub use finscore_metrics::{
    AnnualTrend, ComparativeMetrics, PeriodComparison, build_comparative_metrics, cagr_pct,
    growth_pct,
};

// Scoring
pub use finscore_scoring::{
    Component, ComponentBreakdown, ComponentScores, CompositeScoreInput, CompositeScoreResult,
    LabelThresholds, LatestRowMargins, LegacyBreakdownEntry, LegacyInput, LegacyRule, LegacyScore,
    ScoreLabel, ScoreWeights, ScoringPolicy, derive_fallback_fundamentals, score_composite,
    score_composite_with_policy, score_legacy, score_legacy_fundamentals,
};

// Stores
#[cfg(feature = "store-sqlite")]
pub use finscore_store::SqliteStore;
pub use finscore_store::{InMemoryStore, StoreFactSource};

mod analyzer;
pub use analyzer::{Analysis, Analyzer};

/// Polars export of statement rows.
pub mod frame;
pub use frame::rows_to_frame;
