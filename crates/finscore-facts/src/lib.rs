#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finscore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Turns raw tagged facts into normalized statement rows.
//!
//! - [`FactSeriesResolver`] picks one value per period out of competing tags,
//!   units and amended filings.
//! - [`StatementRowBuilder`] overlays the resolved series into
//!   [`NormalizedFinancialRow`](finscore_core::NormalizedFinancialRow)s.
//! - [`parse_company_facts`] normalizes an EDGAR company-facts document.

/// Row assembly and the reverse rows-to-facts mapping.
pub mod builder;
/// EDGAR company-facts document normalization.
pub mod companyfacts;
/// Statement concepts and their candidate XBRL tags.
pub mod concept;
/// Fact series resolution.
pub mod resolver;

pub use builder::{
    ConceptSeries, StatementRowBuilder, build_statement_rows, rows_to_fact_bag, sort_rows,
};
pub use companyfacts::{CompanyFacts, parse_company_facts};
pub use concept::{Concept, PREFERRED_UNITS};
pub use resolver::{FactSeriesResolver, ResolvedFact, ResolvedSeries};
