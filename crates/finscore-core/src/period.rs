//! Granularity, fiscal period and period key definitions.
//!
//! This module defines [`Granularity`] for selecting annual or quarterly series,
//! [`FiscalPeriod`] and [`PeriodKey`] for identifying a single reporting period,
//! and [`FormType`] for classifying the filing a fact came from.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Reporting granularity of a resolved series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl Granularity {
    /// Returns true if a fact filed on `form` belongs to this granularity.
    #[must_use]
    pub const fn accepts(&self, form: FormType) -> bool {
        matches!(
            (self, form),
            (Self::Annual, FormType::Annual) | (Self::Quarterly, FormType::Quarterly)
        )
    }

    /// Number of periods of this granularity in one year.
    #[must_use]
    pub const fn periods_per_year(&self) -> f64 {
        match self {
            Self::Annual => 1.0,
            Self::Quarterly => 4.0,
        }
    }
}

/// Fiscal period code within a fiscal year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalPeriod {
    /// First fiscal quarter.
    Q1,
    /// Second fiscal quarter.
    Q2,
    /// Third fiscal quarter.
    Q3,
    /// Fourth fiscal quarter.
    Q4,
    /// Full fiscal year.
    FY,
}

impl FiscalPeriod {
    /// Sort rank within a fiscal year: `Q4 > Q3 > Q2 > Q1 > FY`.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::FY => 0,
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    /// Returns true for `Q1..Q4`.
    #[must_use]
    pub const fn is_quarter(&self) -> bool {
        !matches!(self, Self::FY)
    }

    /// Parses an explicit quarter code (`"Q1"`..`"Q4"`, case-insensitive).
    ///
    /// Returns `None` for `"FY"`, half-year codes and anything else, so callers
    /// can fall back to inferring the quarter from the period-end month.
    #[must_use]
    pub fn quarter_from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            "Q4" => Some(Self::Q4),
            _ => None,
        }
    }

    /// Calendar quarter for a month number (1-12).
    #[must_use]
    pub const fn quarter_from_month(month: u32) -> Option<Self> {
        match month {
            1..=3 => Some(Self::Q1),
            4..=6 => Some(Self::Q2),
            7..=9 => Some(Self::Q3),
            10..=12 => Some(Self::Q4),
            _ => None,
        }
    }

    /// Returns the period code as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::FY => "FY",
        }
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one reporting period: `(fiscal year, fiscal period)`.
///
/// Ordering is chronological: by fiscal year, then by [`FiscalPeriod::rank`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period within the year.
    pub fiscal_period: FiscalPeriod,
}

impl PeriodKey {
    /// Creates a new period key.
    #[must_use]
    pub const fn new(fiscal_year: i32, fiscal_period: FiscalPeriod) -> Self {
        Self {
            fiscal_year,
            fiscal_period,
        }
    }

    /// Creates an annual (`FY`) period key.
    #[must_use]
    pub const fn annual(fiscal_year: i32) -> Self {
        Self::new(fiscal_year, FiscalPeriod::FY)
    }

    /// The same fiscal period one year earlier.
    #[must_use]
    pub const fn year_ago(&self) -> Self {
        Self::new(self.fiscal_year - 1, self.fiscal_period)
    }

    /// Returns true if this key identifies a quarter.
    #[must_use]
    pub const fn is_quarter(&self) -> bool {
        self.fiscal_period.is_quarter()
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fiscal_year
            .cmp(&other.fiscal_year)
            .then_with(|| self.fiscal_period.rank().cmp(&other.fiscal_period.rank()))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fiscal_year, self.fiscal_period)
    }
}

/// Classification of the filing form a fact was reported on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report (10-K, 20-F, 40-F and their amendments).
    Annual,
    /// Quarterly report (10-Q and its amendment).
    Quarterly,
    /// Any other form (8-K, S-1, proxy statements, ...).
    Other,
}

impl FormType {
    /// Classifies a raw form string such as `"10-K"` or `"10-Q/A"`.
    #[must_use]
    pub fn classify(form: &str) -> Self {
        match form.trim().to_ascii_uppercase().as_str() {
            "10-K" | "10-K/A" | "20-F" | "20-F/A" | "40-F" | "40-F/A" => Self::Annual,
            "10-Q" | "10-Q/A" => Self::Quarterly,
            _ => Self::Other,
        }
    }

    /// Canonical form string used when re-expressing rows as observations.
    #[must_use]
    pub const fn canonical(granularity: Granularity) -> &'static str {
        match granularity {
            Granularity::Annual => "10-K",
            Granularity::Quarterly => "10-Q",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_key_ordering() {
        let fy = PeriodKey::annual(2024);
        let q1 = PeriodKey::new(2024, FiscalPeriod::Q1);
        let q4 = PeriodKey::new(2024, FiscalPeriod::Q4);
        let prior_q4 = PeriodKey::new(2023, FiscalPeriod::Q4);

        assert!(q4 > q1);
        assert!(q1 > fy);
        assert!(fy > prior_q4);
        assert_eq!(q4.year_ago(), prior_q4);
    }

    #[test]
    fn test_quarter_inference() {
        assert_eq!(FiscalPeriod::quarter_from_month(1), Some(FiscalPeriod::Q1));
        assert_eq!(FiscalPeriod::quarter_from_month(6), Some(FiscalPeriod::Q2));
        assert_eq!(FiscalPeriod::quarter_from_month(9), Some(FiscalPeriod::Q3));
        assert_eq!(FiscalPeriod::quarter_from_month(12), Some(FiscalPeriod::Q4));
        assert_eq!(FiscalPeriod::quarter_from_month(13), None);

        assert_eq!(FiscalPeriod::quarter_from_code("q2"), Some(FiscalPeriod::Q2));
        assert_eq!(FiscalPeriod::quarter_from_code("FY"), None);
        assert_eq!(FiscalPeriod::quarter_from_code("H1"), None);
    }

    #[test]
    fn test_form_classification() {
        assert_eq!(FormType::classify("10-K"), FormType::Annual);
        assert_eq!(FormType::classify("10-K/A"), FormType::Annual);
        assert_eq!(FormType::classify("20-F"), FormType::Annual);
        assert_eq!(FormType::classify("10-Q"), FormType::Quarterly);
        assert_eq!(FormType::classify("8-K"), FormType::Other);

        assert!(Granularity::Annual.accepts(FormType::Annual));
        assert!(!Granularity::Annual.accepts(FormType::Quarterly));
        assert!(!Granularity::Quarterly.accepts(FormType::Other));
    }
}
