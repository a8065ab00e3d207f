//! Normalized financial statement rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::{FiscalPeriod, Granularity, PeriodKey};

/// `numerator / denominator * 100`, or 0 when the result is not finite.
///
/// Percentage fields are never null: a zero or non-finite denominator yields 0
/// so downstream arithmetic stays total.
#[must_use]
pub fn pct_of(numerator: f64, denominator: f64) -> f64 {
    ratio_of(numerator, denominator) * 100.0
}

/// `numerator / denominator`, or 0 when the result is not finite.
#[must_use]
pub fn ratio_of(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// One statement line for one [`PeriodKey`].
///
/// Base figures default to 0 when no concept series supplied them. Derived
/// ratios are always computed from the base figures by
/// [`recompute_derived`](Self::recompute_derived), never reported independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFinancialRow {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period (`FY` for annual rows).
    pub fiscal_period: FiscalPeriod,
    /// Latest period-end date among the facts that populated this row.
    pub period_end: Option<NaiveDate>,

    // Income Statement
    /// Total revenue.
    pub revenue: f64,
    /// Cost of revenue (COGS).
    pub cost_of_revenue: f64,
    /// Gross income.
    pub gross_income: f64,
    /// Operating income.
    pub operating_income: f64,
    /// Net income.
    pub net_income: f64,
    /// Earnings per share (diluted where available).
    pub eps: f64,
    /// Selling, general and administrative expense.
    pub sga_expense: f64,
    /// Research and development expense.
    pub rnd_expense: f64,
    /// Stock-based compensation.
    pub stock_based_compensation: f64,
    /// Interest expense.
    pub interest_expense: f64,

    // Cash Flow Statement
    /// Operating cash flow.
    pub operating_cash_flow: f64,
    /// Capital expenditures, stored as an absolute magnitude.
    pub capital_expenditures: f64,
    /// Free cash flow.
    pub free_cash_flow: f64,
    /// Dividends declared per share.
    pub dividends_per_share: f64,

    // Balance Sheet
    /// Total assets.
    pub total_assets: f64,
    /// Current assets.
    pub current_assets: f64,
    /// Cash and cash equivalents.
    pub cash: f64,
    /// Total liabilities.
    pub total_liabilities: f64,
    /// Current liabilities.
    pub current_liabilities: f64,
    /// Long-term debt.
    pub long_term_debt: f64,
    /// Total stockholders' equity.
    pub total_equity: f64,
    /// Diluted shares outstanding.
    pub diluted_shares: f64,

    // Derived
    /// Gross income as % of revenue.
    pub gross_margin: f64,
    /// Operating income as % of revenue.
    pub operating_margin: f64,
    /// Net income as % of revenue.
    pub net_margin: f64,
    /// Free cash flow as % of revenue.
    pub fcf_margin: f64,
    /// Operating cash flow as % of revenue.
    pub ocf_margin: f64,
    /// SG&A as % of revenue.
    pub sga_ratio: f64,
    /// R&D as % of revenue.
    pub rnd_ratio: f64,
    /// Stock-based compensation as % of revenue.
    pub sbc_ratio: f64,
    /// Capital expenditures as % of revenue.
    pub capex_ratio: f64,
    /// Total liabilities as % of total assets.
    pub debt_to_assets: f64,
    /// Total liabilities over total equity.
    pub debt_to_equity: f64,
    /// Current assets over current liabilities.
    pub current_ratio: f64,
    /// Net income as % of total equity.
    pub roe: f64,
    /// Net income as % of total assets.
    pub roa: f64,
}

impl NormalizedFinancialRow {
    /// Creates a row for `key` with every numeric field set to 0.
    #[must_use]
    pub const fn new(key: PeriodKey) -> Self {
        Self {
            fiscal_year: key.fiscal_year,
            fiscal_period: key.fiscal_period,
            period_end: None,
            revenue: 0.0,
            cost_of_revenue: 0.0,
            gross_income: 0.0,
            operating_income: 0.0,
            net_income: 0.0,
            eps: 0.0,
            sga_expense: 0.0,
            rnd_expense: 0.0,
            stock_based_compensation: 0.0,
            interest_expense: 0.0,
            operating_cash_flow: 0.0,
            capital_expenditures: 0.0,
            free_cash_flow: 0.0,
            dividends_per_share: 0.0,
            total_assets: 0.0,
            current_assets: 0.0,
            cash: 0.0,
            total_liabilities: 0.0,
            current_liabilities: 0.0,
            long_term_debt: 0.0,
            total_equity: 0.0,
            diluted_shares: 0.0,
            gross_margin: 0.0,
            operating_margin: 0.0,
            net_margin: 0.0,
            fcf_margin: 0.0,
            ocf_margin: 0.0,
            sga_ratio: 0.0,
            rnd_ratio: 0.0,
            sbc_ratio: 0.0,
            capex_ratio: 0.0,
            debt_to_assets: 0.0,
            debt_to_equity: 0.0,
            current_ratio: 0.0,
            roe: 0.0,
            roa: 0.0,
        }
    }

    /// The period this row describes.
    #[must_use]
    pub const fn key(&self) -> PeriodKey {
        PeriodKey::new(self.fiscal_year, self.fiscal_period)
    }

    /// Annual for `FY` rows, quarterly otherwise.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        if self.fiscal_period.is_quarter() {
            Granularity::Quarterly
        } else {
            Granularity::Annual
        }
    }

    /// Returns true if revenue, net income and total assets are all exactly zero.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.revenue == 0.0 && self.net_income == 0.0 && self.total_assets == 0.0
    }

    /// Recomputes every derived ratio from the base figures.
    pub fn recompute_derived(&mut self) {
        let revenue = self.revenue;
        self.gross_margin = pct_of(self.gross_income, revenue);
        self.operating_margin = pct_of(self.operating_income, revenue);
        self.net_margin = pct_of(self.net_income, revenue);
        self.fcf_margin = pct_of(self.free_cash_flow, revenue);
        self.ocf_margin = pct_of(self.operating_cash_flow, revenue);
        self.sga_ratio = pct_of(self.sga_expense, revenue);
        self.rnd_ratio = pct_of(self.rnd_expense, revenue);
        self.sbc_ratio = pct_of(self.stock_based_compensation, revenue);
        self.capex_ratio = pct_of(self.capital_expenditures, revenue);
        self.debt_to_assets = pct_of(self.total_liabilities, self.total_assets);
        self.debt_to_equity = ratio_of(self.total_liabilities, self.total_equity);
        self.current_ratio = ratio_of(self.current_assets, self.current_liabilities);
        self.roe = pct_of(self.net_income, self.total_equity);
        self.roa = pct_of(self.net_income, self.total_assets);
    }
}
