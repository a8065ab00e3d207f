//! SQLite-backed statement store.

use async_trait::async_trait;
use chrono::Utc;
use finscore_core::{FactStore, Granularity, NormalizedFinancialRow, Result, ScoreError, Symbol};
use finscore_facts::sort_rows;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

fn store_err(e: impl std::fmt::Display) -> ScoreError {
    ScoreError::Store(e.to_string())
}

/// Persistent statement store in a SQLite database file.
///
/// Each row is stored as JSON under `(symbol, granularity, fiscal year,
/// fiscal period)`; writing the same key again replaces it.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(store_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS financial_statements (
                symbol TEXT NOT NULL,
                granularity TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,
                fiscal_period TEXT NOT NULL,
                period_end TEXT,
                data_json TEXT NOT NULL,
                stored_at TEXT NOT NULL,
                PRIMARY KEY (symbol, granularity, fiscal_year, fiscal_period)
            )",
            [],
        )
        .map_err(store_err)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_statements_symbol_granularity
             ON financial_statements(symbol, granularity)",
            [],
        )
        .map_err(store_err)?;

        debug!("SQLite statement store schema initialized");
        Ok(())
    }

    const fn granularity_to_str(granularity: Granularity) -> &'static str {
        match granularity {
            Granularity::Annual => "A",
            Granularity::Quarterly => "Q",
        }
    }

    /// Symbols with at least one stored row, in ascending order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn symbols(&self) -> Result<Vec<Symbol>> {
        let conn = self.conn.lock().map_err(store_err)?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM financial_statements ORDER BY symbol")
            .map_err(store_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(store_err)?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(Symbol::new(row.map_err(store_err)?));
        }
        Ok(symbols)
    }
}

#[async_trait]
impl FactStore for SqliteStore {
    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn get_statements(
        &self,
        symbol: &Symbol,
        granularity: Granularity,
    ) -> Result<Option<Vec<NormalizedFinancialRow>>> {
        let conn = self.conn.lock().map_err(store_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT data_json FROM financial_statements
                 WHERE symbol = ?1 AND granularity = ?2
                 ORDER BY fiscal_year DESC",
            )
            .map_err(store_err)?;

        let rows = stmt
            .query_map(
                params![symbol.as_str(), Self::granularity_to_str(granularity)],
                |row| row.get::<_, String>(0),
            )
            .map_err(store_err)?;

        let mut statements = Vec::new();
        for row in rows {
            let json = row.map_err(store_err)?;
            let statement: NormalizedFinancialRow =
                serde_json::from_str(&json).map_err(|e| ScoreError::Parse(e.to_string()))?;
            statements.push(statement);
        }

        if statements.is_empty() {
            debug!("No stored statements found");
            return Ok(None);
        }

        sort_rows(&mut statements);
        debug!("Found {} stored statement rows", statements.len());
        Ok(Some(statements))
    }

    #[instrument(skip(self, rows), fields(symbol = %symbol, count = rows.len()))]
    async fn put_statements(&self, symbol: &Symbol, rows: &[NormalizedFinancialRow]) -> Result<()> {
        let stored_at = Utc::now().to_rfc3339();

        let conn = self.conn.lock().map_err(store_err)?;
        let tx = conn.unchecked_transaction().map_err(store_err)?;

        for row in rows {
            let data_json =
                serde_json::to_string(row).map_err(|e| ScoreError::Parse(e.to_string()))?;

            tx.execute(
                "INSERT OR REPLACE INTO financial_statements
                 (symbol, granularity, fiscal_year, fiscal_period, period_end, data_json, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    symbol.as_str(),
                    Self::granularity_to_str(row.granularity()),
                    row.fiscal_year,
                    row.fiscal_period.as_str(),
                    row.period_end.map(|d| d.to_string()),
                    data_json,
                    stored_at
                ],
            )
            .map_err(store_err)?;
        }

        tx.commit().map_err(store_err)?;
        debug!("Stored {} statement rows", rows.len());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(store_err)?;
        conn.execute("DELETE FROM financial_statements", [])
            .map_err(store_err)?;
        debug!("Cleared statement store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finscore_core::{FiscalPeriod, PeriodKey};

    fn row(fy: i32, fp: FiscalPeriod, revenue: f64) -> NormalizedFinancialRow {
        let mut row = NormalizedFinancialRow::new(PeriodKey::new(fy, fp));
        row.revenue = revenue;
        row.net_income = revenue / 10.0;
        row.period_end = NaiveDate::from_ymd_opt(fy, 12, 31);
        row.recompute_derived();
        row
    }

    #[tokio::test]
    async fn test_sqlite_store_initialization() {
        let store = SqliteStore::in_memory();
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");
        let rows = vec![
            row(2024, FiscalPeriod::Q1, 90.0),
            row(2023, FiscalPeriod::Q4, 120.0),
            row(2023, FiscalPeriod::Q3, 85.0),
            row(2023, FiscalPeriod::FY, 380.0),
        ];

        let result = store.get_statements(&symbol, Granularity::Quarterly).await;
        assert!(result.unwrap().is_none());

        store.put_statements(&symbol, &rows).await.unwrap();

        let quarterly = store
            .get_statements(&symbol, Granularity::Quarterly)
            .await
            .unwrap()
            .unwrap();
        let keys: Vec<PeriodKey> = quarterly.iter().map(NormalizedFinancialRow::key).collect();
        let expected: Vec<PeriodKey> = rows[..3].iter().map(NormalizedFinancialRow::key).collect();
        assert_eq!(keys, expected);
        assert_eq!(quarterly[1].revenue, 120.0);
        assert_eq!(quarterly[0].period_end, NaiveDate::from_ymd_opt(2024, 12, 31));

        let annual = store
            .get_statements(&symbol, Granularity::Annual)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(annual.len(), 1);
        assert_eq!(annual[0].key(), PeriodKey::annual(2023));
        assert_eq!(annual[0].revenue, 380.0);
        assert_eq!(store.symbols().unwrap(), vec![symbol]);
    }

    #[tokio::test]
    async fn test_sqlite_replace_and_clear() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("KO");

        store
            .put_statements(&symbol, &[row(2023, FiscalPeriod::FY, 100.0)])
            .await
            .unwrap();
        store
            .put_statements(&symbol, &[row(2023, FiscalPeriod::FY, 110.0)])
            .await
            .unwrap();

        let annual = store
            .get_statements(&symbol, Granularity::Annual)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(annual.len(), 1);
        assert_eq!(annual[0].revenue, 110.0);

        store.clear().await.unwrap();
        assert!(
            store
                .get_statements(&symbol, Granularity::Annual)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_sqlite_persists_to_file() {
        let path = std::env::temp_dir().join(format!(
            "finscore-store-test-{}.db",
            std::process::id()
        ));
        let symbol = Symbol::new("XOM");
        {
            let store = SqliteStore::new(&path).unwrap();
            store
                .put_statements(&symbol, &[row(2022, FiscalPeriod::FY, 400.0)])
                .await
                .unwrap();
        }

        let reopened = SqliteStore::new(&path).unwrap();
        let annual = reopened
            .get_statements(&symbol, Granularity::Annual)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(annual[0].fiscal_year, 2022);

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
