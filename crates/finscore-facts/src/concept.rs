//! Statement concepts and their alternative XBRL tags.
//!
//! Different filers use different XBRL tags for the same concept. Each
//! [`Concept`] carries a ranked list of candidate tags; resolution picks the tag
//! whose series covers the most periods and only falls back to rank order on a
//! tie.

use finscore_core::NormalizedFinancialRow;
use serde::{Deserialize, Serialize};

/// Preferred unit order used to break ties between equally rich unit series.
pub const PREFERRED_UNITS: &[&str] = &["USD", "USD/shares", "shares", "pure"];

/// A statement line item that feeds one base field of a
/// [`NormalizedFinancialRow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Concept {
    /// Total revenue.
    Revenue,
    /// Cost of revenue.
    CostOfRevenue,
    /// Gross profit.
    GrossProfit,
    /// Operating income.
    OperatingIncome,
    /// Net income.
    NetIncome,
    /// Earnings per share.
    Eps,
    /// Selling, general and administrative expense.
    SellingGeneralAdministrative,
    /// Research and development expense.
    ResearchDevelopment,
    /// Stock-based compensation.
    StockBasedCompensation,
    /// Interest expense.
    InterestExpense,
    /// Operating cash flow.
    OperatingCashFlow,
    /// Capital expenditures.
    CapitalExpenditures,
    /// Free cash flow as separately supplied (non-GAAP, local stores only).
    FreeCashFlow,
    /// Dividends declared per share.
    DividendsPerShare,
    /// Total assets.
    TotalAssets,
    /// Current assets.
    CurrentAssets,
    /// Cash and cash equivalents.
    Cash,
    /// Total liabilities.
    TotalLiabilities,
    /// Current liabilities.
    CurrentLiabilities,
    /// Long-term debt.
    LongTermDebt,
    /// Total stockholders' equity.
    TotalEquity,
    /// Diluted shares outstanding.
    DilutedShares,
}

impl Concept {
    /// Every concept, in row field order.
    pub const ALL: [Self; 22] = [
        Self::Revenue,
        Self::CostOfRevenue,
        Self::GrossProfit,
        Self::OperatingIncome,
        Self::NetIncome,
        Self::Eps,
        Self::SellingGeneralAdministrative,
        Self::ResearchDevelopment,
        Self::StockBasedCompensation,
        Self::InterestExpense,
        Self::OperatingCashFlow,
        Self::CapitalExpenditures,
        Self::FreeCashFlow,
        Self::DividendsPerShare,
        Self::TotalAssets,
        Self::CurrentAssets,
        Self::Cash,
        Self::TotalLiabilities,
        Self::CurrentLiabilities,
        Self::LongTermDebt,
        Self::TotalEquity,
        Self::DilutedShares,
    ];

    /// Candidate XBRL tags, primary tag first.
    #[must_use]
    pub const fn tags(&self) -> &'static [&'static str] {
        match self {
            Self::Revenue => &[
                "Revenues",
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                "SalesRevenueNet",
                "RevenueFromContractWithCustomerIncludingAssessedTax",
            ],
            Self::CostOfRevenue => &[
                "CostOfRevenue",
                "CostOfGoodsAndServicesSold",
                "CostOfGoodsSold",
            ],
            Self::GrossProfit => &["GrossProfit"],
            Self::OperatingIncome => &["OperatingIncomeLoss"],
            Self::NetIncome => &[
                "NetIncomeLoss",
                "ProfitLoss",
                "NetIncomeLossAvailableToCommonStockholdersBasic",
            ],
            Self::Eps => &["EarningsPerShareDiluted", "EarningsPerShareBasic"],
            Self::SellingGeneralAdministrative => &[
                "SellingGeneralAndAdministrativeExpense",
                "GeneralAndAdministrativeExpense",
            ],
            Self::ResearchDevelopment => &[
                "ResearchAndDevelopmentExpense",
                "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
            ],
            Self::StockBasedCompensation => &[
                "ShareBasedCompensation",
                "AllocatedShareBasedCompensationExpense",
            ],
            Self::InterestExpense => &["InterestExpense", "InterestExpenseDebt", "InterestPaidNet"],
            Self::OperatingCashFlow => &[
                "NetCashProvidedByUsedInOperatingActivities",
                "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
            ],
            Self::CapitalExpenditures => &[
                "PaymentsToAcquirePropertyPlantAndEquipment",
                "PaymentsToAcquireProductiveAssets",
                "PaymentsForCapitalImprovements",
            ],
            Self::FreeCashFlow => &["FreeCashFlow"],
            Self::DividendsPerShare => &[
                "CommonStockDividendsPerShareDeclared",
                "CommonStockDividendsPerShareCashPaid",
            ],
            Self::TotalAssets => &["Assets"],
            Self::CurrentAssets => &["AssetsCurrent"],
            Self::Cash => &[
                "CashAndCashEquivalentsAtCarryingValue",
                "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
                "Cash",
            ],
            Self::TotalLiabilities => &["Liabilities"],
            Self::CurrentLiabilities => &["LiabilitiesCurrent"],
            Self::LongTermDebt => &[
                "LongTermDebt",
                "LongTermDebtNoncurrent",
                "LongTermDebtAndCapitalLeaseObligations",
            ],
            Self::TotalEquity => &[
                "StockholdersEquity",
                "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
            ],
            Self::DilutedShares => &[
                "WeightedAverageNumberOfDilutedSharesOutstanding",
                "WeightedAverageNumberOfSharesOutstandingBasic",
                "EntityCommonStockSharesOutstanding",
            ],
        }
    }

    /// The tag rows are written back under.
    #[must_use]
    pub const fn primary_tag(&self) -> &'static str {
        self.tags()[0]
    }

    /// Unit of the concept's values.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Eps | Self::DividendsPerShare => "USD/shares",
            Self::DilutedShares => "shares",
            _ => "USD",
        }
    }

    /// Reads the row field this concept populates.
    #[must_use]
    pub const fn read(&self, row: &NormalizedFinancialRow) -> f64 {
        match self {
            Self::Revenue => row.revenue,
            Self::CostOfRevenue => row.cost_of_revenue,
            Self::GrossProfit => row.gross_income,
            Self::OperatingIncome => row.operating_income,
            Self::NetIncome => row.net_income,
            Self::Eps => row.eps,
            Self::SellingGeneralAdministrative => row.sga_expense,
            Self::ResearchDevelopment => row.rnd_expense,
            Self::StockBasedCompensation => row.stock_based_compensation,
            Self::InterestExpense => row.interest_expense,
            Self::OperatingCashFlow => row.operating_cash_flow,
            Self::CapitalExpenditures => row.capital_expenditures,
            Self::FreeCashFlow => row.free_cash_flow,
            Self::DividendsPerShare => row.dividends_per_share,
            Self::TotalAssets => row.total_assets,
            Self::CurrentAssets => row.current_assets,
            Self::Cash => row.cash,
            Self::TotalLiabilities => row.total_liabilities,
            Self::CurrentLiabilities => row.current_liabilities,
            Self::LongTermDebt => row.long_term_debt,
            Self::TotalEquity => row.total_equity,
            Self::DilutedShares => row.diluted_shares,
        }
    }

    /// Writes `value` into the row field this concept populates.
    ///
    /// Capital expenditures are stored as an absolute magnitude whatever sign
    /// convention the filer used.
    pub fn apply(&self, row: &mut NormalizedFinancialRow, value: f64) {
        match self {
            Self::Revenue => row.revenue = value,
            Self::CostOfRevenue => row.cost_of_revenue = value,
            Self::GrossProfit => row.gross_income = value,
            Self::OperatingIncome => row.operating_income = value,
            Self::NetIncome => row.net_income = value,
            Self::Eps => row.eps = value,
            Self::SellingGeneralAdministrative => row.sga_expense = value,
            Self::ResearchDevelopment => row.rnd_expense = value,
            Self::StockBasedCompensation => row.stock_based_compensation = value,
            Self::InterestExpense => row.interest_expense = value,
            Self::OperatingCashFlow => row.operating_cash_flow = value,
            Self::CapitalExpenditures => row.capital_expenditures = value.abs(),
            Self::FreeCashFlow => row.free_cash_flow = value,
            Self::DividendsPerShare => row.dividends_per_share = value,
            Self::TotalAssets => row.total_assets = value,
            Self::CurrentAssets => row.current_assets = value,
            Self::Cash => row.cash = value,
            Self::TotalLiabilities => row.total_liabilities = value,
            Self::CurrentLiabilities => row.current_liabilities = value,
            Self::LongTermDebt => row.long_term_debt = value,
            Self::TotalEquity => row.total_equity = value,
            Self::DilutedShares => row.diluted_shares = value,
        }
    }
}

/// Rank of `unit` in [`PREFERRED_UNITS`]; unknown units rank last.
#[must_use]
pub fn unit_rank(unit: &str) -> usize {
    PREFERRED_UNITS
        .iter()
        .position(|u| *u == unit)
        .unwrap_or(PREFERRED_UNITS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finscore_core::PeriodKey;

    #[test]
    fn test_every_concept_has_tags() {
        for concept in Concept::ALL {
            assert!(!concept.tags().is_empty(), "{concept:?} has no tags");
        }
        assert_eq!(Concept::Revenue.primary_tag(), "Revenues");
        assert_eq!(Concept::Eps.unit(), "USD/shares");
    }

    #[test]
    fn test_apply_and_read_capex_magnitude() {
        let mut row = NormalizedFinancialRow::new(PeriodKey::annual(2024));
        Concept::CapitalExpenditures.apply(&mut row, -120.0);
        assert_eq!(Concept::CapitalExpenditures.read(&row), 120.0);

        Concept::NetIncome.apply(&mut row, -3.0);
        assert_eq!(row.net_income, -3.0);
    }

    #[test]
    fn test_unit_rank() {
        assert_eq!(unit_rank("USD"), 0);
        assert_eq!(unit_rank("shares"), 2);
        assert_eq!(unit_rank("EUR"), PREFERRED_UNITS.len());
    }
}
