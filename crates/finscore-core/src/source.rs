//! Source and store traits for raw facts, quotes and curated fundamentals.
//!
//! These are the seams to the collaborators that sit upstream of normalization
//! and scoring:
//!
//! - [`FactSource`] - Raw tagged facts for a symbol (filings API, local store, ...)
//! - [`QuoteSource`] - Last trade price
//! - [`FundamentalsSource`] - Curated fundamentals records
//! - [`FactStore`] - Persisted normalized statement rows

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    fundamentals::Fundamentals,
    period::Granularity,
    row::NormalizedFinancialRow,
    types::{FactBag, Symbol},
};

/// Provider of raw tagged fact observations.
///
/// Implementations normalize whatever they read into the [`FactBag`] shape so
/// fact resolution does not care where the observations came from.
#[async_trait]
pub trait FactSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g. "SEC company facts").
    fn name(&self) -> &str;

    /// Fetches every observation available for `symbol`.
    ///
    /// An empty bag means the source has nothing for the symbol; callers may
    /// fall back to another source.
    async fn fetch_facts(&self, symbol: &Symbol) -> Result<FactBag>;
}

/// Provider of last-trade quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync + Debug {
    /// Returns the last trade price for `symbol`, if known.
    async fn last_price(&self, symbol: &Symbol) -> Result<Option<f64>>;
}

/// Provider of curated fundamentals records.
#[async_trait]
pub trait FundamentalsSource: Send + Sync + Debug {
    /// Returns the curated record for `symbol`, or `None` when there is none.
    async fn curated_fundamentals(&self, symbol: &Symbol) -> Result<Option<Fundamentals>>;
}

/// Persisted store of normalized statement rows.
///
/// Implementations can keep rows in various backends (SQLite, in-memory, etc.).
#[async_trait]
pub trait FactStore: Send + Sync + Debug {
    /// Retrieves stored rows for a symbol and granularity, most recent first.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    async fn get_statements(
        &self,
        symbol: &Symbol,
        granularity: Granularity,
    ) -> Result<Option<Vec<NormalizedFinancialRow>>>;

    /// Stores rows, replacing any row with the same period key.
    async fn put_statements(&self, symbol: &Symbol, rows: &[NormalizedFinancialRow])
    -> Result<()>;

    /// Removes every stored row.
    async fn clear(&self) -> Result<()>;
}
