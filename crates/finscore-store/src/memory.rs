//! In-memory statement store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finscore_core::{FactStore, Granularity, NormalizedFinancialRow, PeriodKey, Result, Symbol};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Stored row with the time it was written.
#[derive(Debug, Clone)]
struct StoredRow {
    row: NormalizedFinancialRow,
    stored_at: DateTime<Utc>,
}

type StoreKey = (Symbol, Granularity);

/// Statement store backed by `RwLock`-protected maps.
///
/// Rows are lost when the store is dropped. Useful for tests and for feeding
/// locally maintained statements into the pipeline.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<StoreKey, BTreeMap<PeriodKey, StoredRow>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows across all symbols.
    pub async fn len(&self) -> usize {
        self.rows.read().await.values().map(BTreeMap::len).sum()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// When the row for `key` was last written.
    pub async fn stored_at(&self, symbol: &Symbol, key: PeriodKey) -> Option<DateTime<Utc>> {
        let granularity = if key.is_quarter() {
            Granularity::Quarterly
        } else {
            Granularity::Annual
        };
        self.rows
            .read()
            .await
            .get(&(symbol.clone(), granularity))
            .and_then(|rows| rows.get(&key))
            .map(|stored| stored.stored_at)
    }
}

#[async_trait]
impl FactStore for InMemoryStore {
    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn get_statements(
        &self,
        symbol: &Symbol,
        granularity: Granularity,
    ) -> Result<Option<Vec<NormalizedFinancialRow>>> {
        let store = self.rows.read().await;
        match store.get(&(symbol.clone(), granularity)) {
            Some(rows) if !rows.is_empty() => {
                debug!(count = rows.len(), "Store hit for statements");
                Ok(Some(rows.values().rev().map(|s| s.row.clone()).collect()))
            }
            _ => {
                debug!("Store miss for statements");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, rows), fields(symbol = %symbol, count = rows.len()))]
    async fn put_statements(&self, symbol: &Symbol, rows: &[NormalizedFinancialRow]) -> Result<()> {
        let stored_at = Utc::now();
        let mut store = self.rows.write().await;

        for row in rows {
            store
                .entry((symbol.clone(), row.granularity()))
                .or_default()
                .insert(
                    row.key(),
                    StoredRow {
                        row: row.clone(),
                        stored_at,
                    },
                );
        }

        debug!("Stored {} statement rows", rows.len());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.rows.write().await.clear();
        debug!("Cleared statement store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finscore_core::FiscalPeriod;

    fn row(fy: i32, fp: FiscalPeriod, revenue: f64) -> NormalizedFinancialRow {
        let mut row = NormalizedFinancialRow::new(PeriodKey::new(fy, fp));
        row.revenue = revenue;
        row.recompute_derived();
        row
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::new();
        let symbol = Symbol::new("msft");
        assert!(store.is_empty().await);

        store
            .put_statements(
                &symbol,
                &[
                    row(2022, FiscalPeriod::FY, 90.0),
                    row(2024, FiscalPeriod::Q1, 30.0),
                    row(2023, FiscalPeriod::FY, 100.0),
                ],
            )
            .await
            .unwrap();
        assert_eq!(store.len().await, 3);

        let annual = store
            .get_statements(&symbol, Granularity::Annual)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].fiscal_year, 2023);

        let quarterly = store
            .get_statements(&Symbol::new("MSFT"), Granularity::Quarterly)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quarterly.len(), 1);
        assert!(
            store
                .stored_at(&symbol, PeriodKey::new(2024, FiscalPeriod::Q1))
                .await
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_put_replaces_same_period() {
        let store = InMemoryStore::new();
        let symbol = Symbol::new("AAPL");

        store
            .put_statements(&symbol, &[row(2023, FiscalPeriod::FY, 100.0)])
            .await
            .unwrap();
        store
            .put_statements(&symbol, &[row(2023, FiscalPeriod::FY, 105.0)])
            .await
            .unwrap();

        let rows = store
            .get_statements(&symbol, Granularity::Annual)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, 105.0);
    }

    #[tokio::test]
    async fn test_miss_and_clear() {
        let store = InMemoryStore::new();
        let symbol = Symbol::new("IBM");
        assert!(
            store
                .get_statements(&symbol, Granularity::Annual)
                .await
                .unwrap()
                .is_none()
        );

        store
            .put_statements(&symbol, &[row(2023, FiscalPeriod::FY, 1.0)])
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }
}
