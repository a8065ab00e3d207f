//! Approximate fundamentals derived from statement rows when no curated
//! record exists.

use finscore_core::{Fundamentals, FundamentalsOrigin, MoatRating, NormalizedFinancialRow};
use finscore_metrics::round2;
use tracing::debug;

use crate::curves::DIVIDEND_SAFETY_BY_PAYOUT;
use crate::legacy::score_legacy_fundamentals;

/// ROE (%) assumed when equity is zero.
pub const DEFAULT_ROE: f64 = 8.0;
/// Debt-to-equity assumed when equity is zero.
pub const DEFAULT_DEBT_TO_EQUITY: f64 = 2.5;
/// Debt-to-equity assumed when equity is known but liabilities are zero.
pub const UNLEVERED_DEBT_TO_EQUITY: f64 = 1.2;
/// Dividend safety score for companies paying no dividend.
pub const NO_DIVIDEND_SAFETY: f64 = 50.0;
/// Dividend safety score for a dividend paid without positive earnings.
pub const UNCOVERED_DIVIDEND_SAFETY: f64 = 30.0;

/// Derives an approximate [`Fundamentals`] record from rows sorted most
/// recent first.
///
/// P/E uses `quote_price` over the latest positive EPS and is 0 without
/// either. Returns `None` when `rows` is empty.
///
/// # Example
///
/// ```
/// use finscore_scoring::derive_fallback_fundamentals;
///
/// assert!(derive_fallback_fundamentals(&[], Some(100.0)).is_none());
/// ```
#[must_use]
pub fn derive_fallback_fundamentals(
    rows: &[NormalizedFinancialRow],
    quote_price: Option<f64>,
) -> Option<Fundamentals> {
    if rows.is_empty() {
        return None;
    }

    let income = rows
        .iter()
        .find(|row| row.eps > 0.0 || row.net_income != 0.0);
    let balance = rows
        .iter()
        .find(|row| row.total_equity != 0.0 || row.total_liabilities != 0.0);
    let dividend = rows
        .iter()
        .find(|row| row.dividends_per_share != 0.0 || row.eps != 0.0);

    let eps = income.map_or(0.0, |row| row.eps);
    let pe_ratio = match quote_price {
        Some(price) if price.is_finite() && price > 0.0 && eps > 0.0 => round2(price / eps),
        _ => 0.0,
    };

    let net_income = income.map_or(0.0, |row| row.net_income);
    let equity = balance.map_or(0.0, |row| row.total_equity);
    let liabilities = balance.map_or(0.0, |row| row.total_liabilities);

    let roe = if equity == 0.0 {
        DEFAULT_ROE
    } else {
        round2(net_income / equity * 100.0)
    };

    let debt_to_equity = if equity == 0.0 {
        DEFAULT_DEBT_TO_EQUITY
    } else if liabilities == 0.0 {
        UNLEVERED_DEBT_TO_EQUITY
    } else {
        round2(liabilities / equity)
    };

    let (payout_ratio, dividend_safety_score) = payout_and_safety(dividend);

    let mut fundamentals = Fundamentals {
        pe_ratio: Some(pe_ratio),
        peg_ratio: None,
        roe: Some(roe),
        debt_to_equity: Some(debt_to_equity),
        payout_ratio,
        moat_rating: MoatRating::Unknown,
        dividend_growth_streak: Some(dividend_growth_streak(rows)),
        dividend_safety_score: Some(dividend_safety_score),
        historical_volatility: None,
        health_rating: None,
        verdict: None,
        origin: FundamentalsOrigin::Derived,
    };

    let legacy = score_legacy_fundamentals(&fundamentals);
    fundamentals.health_rating = Some(legacy.health_rating);
    fundamentals.verdict = Some(legacy.verdict);

    debug!(
        rows = rows.len(),
        pe_ratio,
        roe,
        debt_to_equity,
        health_rating = legacy.health_rating,
        "Derived fallback fundamentals"
    );

    Some(fundamentals)
}

fn payout_and_safety(row: Option<&NormalizedFinancialRow>) -> (Option<f64>, f64) {
    let (dps, eps) = row.map_or((0.0, 0.0), |row| (row.dividends_per_share, row.eps));
    if dps <= 0.0 {
        (Some(0.0), NO_DIVIDEND_SAFETY)
    } else if eps <= 0.0 {
        (None, UNCOVERED_DIVIDEND_SAFETY)
    } else {
        let payout = round2(dps / eps * 100.0);
        (Some(payout), DIVIDEND_SAFETY_BY_PAYOUT.score(payout))
    }
}

/// Consecutive years, ending at the latest annual row, of positive and
/// non-declining dividends per share.
///
/// Walks annual rows oldest to newest; a non-positive or declining dividend
/// resets the streak to zero.
#[must_use]
pub fn dividend_growth_streak(rows: &[NormalizedFinancialRow]) -> u32 {
    let mut annual: Vec<&NormalizedFinancialRow> = rows
        .iter()
        .filter(|row| !row.fiscal_period.is_quarter())
        .collect();
    annual.sort_by_key(|row| row.fiscal_year);

    let mut streak = 0;
    let mut previous: Option<f64> = None;
    for row in annual {
        let dps = row.dividends_per_share;
        let declining = previous.is_some_and(|prev| dps < prev);
        if dps <= 0.0 || declining {
            streak = 0;
        } else {
            streak += 1;
        }
        previous = Some(dps);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use finscore_core::{FiscalPeriod, PeriodKey, Verdict};

    fn annual(fy: i32, eps: f64, dps: f64) -> NormalizedFinancialRow {
        let mut row = NormalizedFinancialRow::new(PeriodKey::annual(fy));
        row.revenue = 1_000.0;
        row.net_income = eps * 100.0;
        row.eps = eps;
        row.dividends_per_share = dps;
        row.total_equity = 500.0;
        row.total_liabilities = 400.0;
        row.total_assets = 900.0;
        row.recompute_derived();
        row
    }

    #[test]
    fn test_empty_rows() {
        assert!(derive_fallback_fundamentals(&[], Some(123.0)).is_none());
        assert!(derive_fallback_fundamentals(&[], None).is_none());
    }

    #[test]
    fn test_derive_from_rows() {
        let rows = vec![
            annual(2024, 5.0, 2.0),
            annual(2023, 4.5, 1.8),
            annual(2022, 4.0, 1.8),
            annual(2021, 3.5, 1.5),
        ];
        let f = derive_fallback_fundamentals(&rows, Some(100.0)).unwrap();

        assert_eq!(f.origin, FundamentalsOrigin::Derived);
        assert_eq!(f.pe_ratio, Some(20.0));
        assert_eq!(f.roe, Some(100.0));
        assert_eq!(f.debt_to_equity, Some(0.8));
        assert_eq!(f.payout_ratio, Some(40.0));
        assert_eq!(f.dividend_safety_score, Some(90.0));
        assert_eq!(f.dividend_growth_streak, Some(4));
        assert_eq!(f.moat_rating, MoatRating::Unknown);
        // 50 base + 10 payout.
        assert_eq!(f.health_rating, Some(60));
        assert_eq!(f.verdict, Some(Verdict::Hold));
    }

    #[test]
    fn test_no_price_or_loss_gives_zero_pe() {
        let rows = vec![annual(2024, 5.0, 0.0)];
        assert_eq!(derive_fallback_fundamentals(&rows, None).unwrap().pe_ratio, Some(0.0));

        let rows = vec![annual(2024, -1.0, 0.0)];
        let f = derive_fallback_fundamentals(&rows, Some(50.0)).unwrap();
        assert_eq!(f.pe_ratio, Some(0.0));
        assert_eq!(f.payout_ratio, Some(0.0));
        assert_eq!(f.dividend_safety_score, Some(50.0));
    }

    #[test]
    fn test_balance_sheet_defaults() {
        let mut row = annual(2024, 1.0, 0.0);
        row.total_equity = 0.0;
        row.total_liabilities = 0.0;
        let f = derive_fallback_fundamentals(&[row], None).unwrap();
        assert_eq!(f.roe, Some(DEFAULT_ROE));
        assert_eq!(f.debt_to_equity, Some(DEFAULT_DEBT_TO_EQUITY));

        let mut row = annual(2024, 1.0, 0.0);
        row.total_liabilities = 0.0;
        let f = derive_fallback_fundamentals(&[row], None).unwrap();
        assert_eq!(f.debt_to_equity, Some(UNLEVERED_DEBT_TO_EQUITY));
    }

    #[test]
    fn test_uncovered_dividend() {
        let f = derive_fallback_fundamentals(&[annual(2024, -0.5, 1.0)], None).unwrap();
        assert_eq!(f.payout_ratio, None);
        assert_eq!(f.dividend_safety_score, Some(UNCOVERED_DIVIDEND_SAFETY));
    }

    #[test]
    fn test_payout_bands() {
        for (dps, safety) in [(2.5, 75.0), (3.5, 55.0), (4.5, 30.0)] {
            let f = derive_fallback_fundamentals(&[annual(2024, 5.0, dps)], None).unwrap();
            assert_eq!(f.dividend_safety_score, Some(safety), "dps {dps}");
        }
    }

    #[test]
    fn test_streak_resets() {
        let rows = vec![
            annual(2024, 5.0, 1.2),
            annual(2023, 5.0, 1.1),
            annual(2022, 5.0, 1.0),
            annual(2021, 5.0, 1.5),
            annual(2020, 5.0, 1.4),
        ];
        // 2022 declines and resets the streak; 2023 and 2024 count.
        assert_eq!(dividend_growth_streak(&rows), 2);

        let rows = vec![annual(2024, 5.0, 1.0), annual(2023, 5.0, 0.0)];
        assert_eq!(dividend_growth_streak(&rows), 1);

        // Quarterly rows never count.
        let mut q = annual(2024, 5.0, 1.0);
        q.fiscal_period = FiscalPeriod::Q4;
        assert_eq!(dividend_growth_streak(&[q]), 0);
    }

    #[test]
    fn test_informative_rows_skip_placeholders() {
        let mut latest = NormalizedFinancialRow::new(PeriodKey::annual(2025));
        latest.revenue = 10.0;
        let rows = vec![latest, annual(2024, 4.0, 1.0)];
        let f = derive_fallback_fundamentals(&rows, Some(40.0)).unwrap();
        assert_eq!(f.pe_ratio, Some(10.0));
        assert_eq!(f.debt_to_equity, Some(0.8));
        assert_eq!(f.payout_ratio, Some(25.0));
    }
}
