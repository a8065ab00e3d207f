//! End-to-end pipeline: facts to rows, metrics, fundamentals and scores.

use std::sync::Arc;

use futures::future::join_all;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use finscore_core::{
    FactBag, FactSource, Fundamentals, FundamentalsSource, Granularity, NormalizedFinancialRow,
    QuoteSource, Result, ScoreError, Symbol,
};
use finscore_facts::{build_statement_rows, sort_rows};
use finscore_metrics::{ComparativeMetrics, build_comparative_metrics};
use finscore_scoring::{
    CompositeScoreResult, LatestRowMargins, LegacyScore, ScoringPolicy,
    derive_fallback_fundamentals, score_composite_with_policy, score_legacy_fundamentals,
};

use crate::frame::rows_to_frame;

/// Everything computed for one symbol.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    /// Symbol analyzed.
    pub symbol: Symbol,
    /// Annual rows, most recent first.
    pub annual_rows: Vec<NormalizedFinancialRow>,
    /// Quarterly rows, most recent first.
    pub quarterly_rows: Vec<NormalizedFinancialRow>,
    /// QoQ, YoY and multi-year comparisons.
    pub metrics: ComparativeMetrics,
    /// Curated fundamentals when available, otherwise derived from the rows.
    pub fundamentals: Fundamentals,
    /// Weighted five-component score.
    pub composite: CompositeScoreResult,
    /// Additive rule-based score.
    pub legacy: LegacyScore,
}

impl Analysis {
    /// Annual and quarterly rows merged, most recent first.
    #[must_use]
    pub fn all_rows(&self) -> Vec<NormalizedFinancialRow> {
        let mut rows: Vec<NormalizedFinancialRow> = self
            .quarterly_rows
            .iter()
            .chain(&self.annual_rows)
            .cloned()
            .collect();
        sort_rows(&mut rows);
        rows
    }

    /// All rows as a DataFrame; see [`rows_to_frame`].
    ///
    /// # Errors
    /// Returns [`ScoreError::Other`] if polars rejects the columns.
    pub fn to_frame(&self) -> Result<DataFrame> {
        rows_to_frame(&self.symbol, &self.all_rows())
    }
}

/// Runs the fundamentals pipeline over a set of pluggable sources.
///
/// Fact sources are tried in registration order; the first one that returns
/// a non-empty bag wins. Curated fundamentals and quotes are optional.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use finscore::{Analyzer, InMemoryStore, StoreFactSource, Symbol};
///
/// let store = Arc::new(InMemoryStore::new());
/// let analyzer = Analyzer::new().with_source(Arc::new(StoreFactSource::new(store)));
///
/// let analysis = analyzer.analyze(&Symbol::new("AAPL")).await?;
/// println!("{} {}", analysis.composite.composite_score, analysis.composite.label);
/// ```
#[derive(Default)]
pub struct Analyzer {
    fact_sources: Vec<Arc<dyn FactSource>>,
    fundamentals_source: Option<Arc<dyn FundamentalsSource>>,
    quote_source: Option<Arc<dyn QuoteSource>>,
    policy: ScoringPolicy,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field(
                "fact_sources",
                &self
                    .fact_sources
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>(),
            )
            .field("fundamentals_source", &self.fundamentals_source.is_some())
            .field("quote_source", &self.quote_source.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Analyzer {
    /// Creates an analyzer with no sources and the default scoring policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fact source after the ones already registered.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn FactSource>) -> Self {
        self.fact_sources.push(source);
        self
    }

    /// Sets the curated fundamentals source.
    #[must_use]
    pub fn with_fundamentals_source(mut self, source: Arc<dyn FundamentalsSource>) -> Self {
        self.fundamentals_source = Some(source);
        self
    }

    /// Sets the quote source used for derived P/E.
    #[must_use]
    pub fn with_quote_source(mut self, source: Arc<dyn QuoteSource>) -> Self {
        self.quote_source = Some(source);
        self
    }

    /// Replaces the composite scoring policy.
    ///
    /// # Errors
    /// Returns [`ScoreError::InvalidParameter`] if the policy does not validate.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Result<Self> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    /// Adds a fact source after the ones already registered.
    pub fn register_source(&mut self, source: Arc<dyn FactSource>) {
        self.fact_sources.push(source);
    }

    /// The active scoring policy.
    #[must_use]
    pub const fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Names of the registered fact sources, in the order they are tried.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.fact_sources.iter().map(|s| s.name()).collect()
    }

    /// Fetches raw facts from the first source that has any.
    ///
    /// # Errors
    /// - [`ScoreError::SourceNotConfigured`] if no fact source is registered.
    /// - The last source error if every source failed.
    /// - [`ScoreError::DataNotAvailable`] if every source answered with nothing.
    pub async fn fetch_facts(&self, symbol: &Symbol) -> Result<FactBag> {
        if self.fact_sources.is_empty() {
            return Err(ScoreError::SourceNotConfigured(
                "No fact sources configured".to_string(),
            ));
        }

        let mut last_error = None;

        for source in &self.fact_sources {
            match source.fetch_facts(symbol).await {
                Ok(bag) if bag.is_empty() => {
                    debug!(source = source.name(), "Source returned no facts, trying next");
                }
                Ok(bag) => {
                    debug!(source = source.name(), tags = bag.len(), "Fetched facts");
                    return Ok(bag);
                }
                Err(e) => {
                    warn!(
                        source = source.name(),
                        error = %e,
                        "Source failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ScoreError::DataNotAvailable(format!("No facts found for {}", symbol))
        }))
    }

    /// Runs the full pipeline for one symbol.
    ///
    /// Failures of the fundamentals or quote source are logged and treated as
    /// missing data; only fact fetching can fail the analysis.
    ///
    /// # Errors
    /// Propagates [`Self::fetch_facts`] errors, and returns
    /// [`ScoreError::DataNotAvailable`] when the facts resolve to no rows.
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub async fn analyze(&self, symbol: &Symbol) -> Result<Analysis> {
        let bag = self.fetch_facts(symbol).await?;

        let annual_rows = build_statement_rows(&bag, Granularity::Annual);
        let quarterly_rows = build_statement_rows(&bag, Granularity::Quarterly);
        if annual_rows.is_empty() && quarterly_rows.is_empty() {
            return Err(ScoreError::DataNotAvailable(format!(
                "No statement rows could be built for {}",
                symbol
            )));
        }

        let mut combined: Vec<NormalizedFinancialRow> =
            quarterly_rows.iter().chain(&annual_rows).cloned().collect();
        sort_rows(&mut combined);
        let metrics = build_comparative_metrics(&combined);

        // Annual rows carry full-year ratios; quarters stand in when there are none.
        let primary_rows = if annual_rows.is_empty() {
            &quarterly_rows
        } else {
            &annual_rows
        };

        let fundamentals = match self.curated_fundamentals(symbol).await {
            Some(curated) => curated,
            None => {
                let price = self.last_price(symbol).await;
                derive_fallback_fundamentals(primary_rows, price).unwrap_or_default()
            }
        };

        let margins = primary_rows
            .first()
            .map(LatestRowMargins::from_row)
            .unwrap_or_default();

        let composite = score_composite_with_policy(&fundamentals, &metrics, &margins, &self.policy);
        let legacy = score_legacy_fundamentals(&fundamentals);

        debug!(
            annual = annual_rows.len(),
            quarterly = quarterly_rows.len(),
            origin = ?fundamentals.origin,
            composite = composite.composite_score,
            label = %composite.label,
            health_rating = legacy.health_rating,
            "Analysis complete"
        );

        Ok(Analysis {
            symbol: symbol.clone(),
            annual_rows,
            quarterly_rows,
            metrics,
            fundamentals,
            composite,
            legacy,
        })
    }

    /// Analyzes several symbols concurrently, returning results in input order.
    pub async fn analyze_many(&self, symbols: &[Symbol]) -> Vec<(Symbol, Result<Analysis>)> {
        let results = join_all(symbols.iter().map(|symbol| self.analyze(symbol))).await;
        symbols.iter().cloned().zip(results).collect()
    }

    async fn curated_fundamentals(&self, symbol: &Symbol) -> Option<Fundamentals> {
        let source = self.fundamentals_source.as_ref()?;
        match source.curated_fundamentals(symbol).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Curated fundamentals lookup failed, deriving from rows");
                None
            }
        }
    }

    async fn last_price(&self, symbol: &Symbol) -> Option<f64> {
        let source = self.quote_source.as_ref()?;
        match source.last_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(error = %e, "Quote lookup failed, continuing without price");
                None
            }
        }
    }
}
