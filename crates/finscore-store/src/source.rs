//! A statement store exposed as a fact source.

use async_trait::async_trait;
use finscore_core::{FactBag, FactSource, FactStore, Granularity, Result, Symbol};
use finscore_facts::rows_to_fact_bag;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Reads stored statement rows back as raw observations so they flow through
/// the same resolution path as filings data.
#[derive(Debug, Clone)]
pub struct StoreFactSource {
    store: Arc<dyn FactStore>,
    name: String,
}

impl StoreFactSource {
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self {
            store,
            name: "local statement store".to_string(),
        }
    }

    /// Overrides the source name used in logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The wrapped store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn FactStore> {
        &self.store
    }
}

#[async_trait]
impl FactSource for StoreFactSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(source = %self.name, symbol = %symbol))]
    async fn fetch_facts(&self, symbol: &Symbol) -> Result<FactBag> {
        let mut rows = Vec::new();
        for granularity in [Granularity::Annual, Granularity::Quarterly] {
            if let Some(stored) = self.store.get_statements(symbol, granularity).await? {
                rows.extend(stored);
            }
        }

        let bag = rows_to_fact_bag(&rows);
        debug!(rows = rows.len(), observations = bag.len(), "Read facts from store");
        Ok(bag)
    }
}
