//! Polars export of normalized statement rows.

use chrono::Datelike;
use polars::prelude::*;

use finscore_core::{NormalizedFinancialRow, Result, ScoreError, Symbol};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

type FieldReader = fn(&NormalizedFinancialRow) -> f64;

/// Numeric columns, in output order.
const NUMERIC_COLUMNS: &[(&str, FieldReader)] = &[
    ("revenue", |r| r.revenue),
    ("cost_of_revenue", |r| r.cost_of_revenue),
    ("gross_income", |r| r.gross_income),
    ("operating_income", |r| r.operating_income),
    ("net_income", |r| r.net_income),
    ("eps", |r| r.eps),
    ("sga_expense", |r| r.sga_expense),
    ("rnd_expense", |r| r.rnd_expense),
    ("stock_based_compensation", |r| r.stock_based_compensation),
    ("interest_expense", |r| r.interest_expense),
    ("operating_cash_flow", |r| r.operating_cash_flow),
    ("capital_expenditures", |r| r.capital_expenditures),
    ("free_cash_flow", |r| r.free_cash_flow),
    ("dividends_per_share", |r| r.dividends_per_share),
    ("total_assets", |r| r.total_assets),
    ("current_assets", |r| r.current_assets),
    ("cash", |r| r.cash),
    ("total_liabilities", |r| r.total_liabilities),
    ("current_liabilities", |r| r.current_liabilities),
    ("long_term_debt", |r| r.long_term_debt),
    ("total_equity", |r| r.total_equity),
    ("diluted_shares", |r| r.diluted_shares),
    ("gross_margin", |r| r.gross_margin),
    ("operating_margin", |r| r.operating_margin),
    ("net_margin", |r| r.net_margin),
    ("fcf_margin", |r| r.fcf_margin),
    ("ocf_margin", |r| r.ocf_margin),
    ("sga_ratio", |r| r.sga_ratio),
    ("rnd_ratio", |r| r.rnd_ratio),
    ("sbc_ratio", |r| r.sbc_ratio),
    ("capex_ratio", |r| r.capex_ratio),
    ("debt_to_assets", |r| r.debt_to_assets),
    ("debt_to_equity", |r| r.debt_to_equity),
    ("current_ratio", |r| r.current_ratio),
    ("roe", |r| r.roe),
    ("roa", |r| r.roa),
];

/// Converts rows to a DataFrame with one row per period.
///
/// Columns: `symbol`, `fiscal_year`, `fiscal_period`, `period_end` (Date,
/// nullable), then every base figure and derived ratio. Row order is kept.
///
/// # Errors
/// Returns [`ScoreError::Other`] if polars rejects the columns.
pub fn rows_to_frame(symbol: &Symbol, rows: &[NormalizedFinancialRow]) -> Result<DataFrame> {
    let symbols: Vec<&str> = vec![symbol.as_str(); rows.len()];
    let fiscal_years: Vec<i32> = rows.iter().map(|r| r.fiscal_year).collect();
    let fiscal_periods: Vec<&str> = rows.iter().map(|r| r.fiscal_period.as_str()).collect();
    let period_ends: Vec<Option<i32>> = rows
        .iter()
        .map(|r| {
            r.period_end
                .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        })
        .collect();

    let period_end_col = Column::new("period_end".into(), period_ends)
        .cast(&DataType::Date)
        .map_err(|e| ScoreError::Other(e.to_string()))?;

    let mut columns = Vec::with_capacity(NUMERIC_COLUMNS.len() + 4);
    columns.push(Column::new("symbol".into(), symbols));
    columns.push(Column::new("fiscal_year".into(), fiscal_years));
    columns.push(Column::new("fiscal_period".into(), fiscal_periods));
    columns.push(period_end_col);

    for (name, read) in NUMERIC_COLUMNS {
        let values: Vec<f64> = rows.iter().map(read).collect();
        columns.push(Column::new((*name).into(), values));
    }

    DataFrame::new(columns).map_err(|e| ScoreError::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finscore_core::{FiscalPeriod, PeriodKey};

    fn row(key: PeriodKey, revenue: f64) -> NormalizedFinancialRow {
        let mut row = NormalizedFinancialRow::new(key);
        row.revenue = revenue;
        row.net_income = revenue / 5.0;
        row.recompute_derived();
        row
    }

    #[test]
    fn test_rows_to_frame() {
        let mut latest = row(PeriodKey::new(2024, FiscalPeriod::Q1), 120.0);
        latest.period_end = NaiveDate::from_ymd_opt(2024, 3, 31);
        let rows = vec![latest, row(PeriodKey::annual(2023), 400.0)];

        let df = rows_to_frame(&Symbol::new("AAPL"), &rows).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), NUMERIC_COLUMNS.len() + 4);

        let periods = df.column("fiscal_period").unwrap().str().unwrap();
        assert_eq!(periods.get(0), Some("Q1"));
        assert_eq!(periods.get(1), Some("FY"));

        let revenue = df.column("revenue").unwrap().f64().unwrap();
        assert_eq!(revenue.get(1), Some(400.0));

        let margin = df.column("net_margin").unwrap().f64().unwrap();
        assert_eq!(margin.get(0), Some(20.0));

        let period_end = df.column("period_end").unwrap();
        assert_eq!(period_end.dtype(), &DataType::Date);
        assert_eq!(period_end.null_count(), 1);
    }

    #[test]
    fn test_empty_rows() {
        let df = rows_to_frame(&Symbol::new("AAPL"), &[]).unwrap();
        assert_eq!(df.height(), 0);
        assert!(df.column("roe").is_ok());
    }
}
