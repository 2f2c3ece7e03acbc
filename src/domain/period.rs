//! Billing period handling

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::AnalysisError;

/// A calendar month in which usage was billed, e.g. `2024-01`.
///
/// Billing exports key both file names and line items by month, so this is
/// the filter unit for a whole analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// Create a period from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self, AnalysisError> {
        if !(1..=12).contains(&month) || !(2000..=9999).contains(&year) {
            return Err(AnalysisError::configuration(format!(
                "invalid billing period '{year:04}-{month:02}'"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Whether a usage date falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Whether an object key refers to this period.
    ///
    /// Export files embed the period label in their key path
    /// (`cur-reports/cur-2024-01/...`), so a plain substring test is the
    /// listing-side filter.
    pub fn matches_key(&self, key: &str) -> bool {
        key.contains(&self.to_string())
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingPeriod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || AnalysisError::configuration(format!("invalid billing period '{s}', expected YYYY-MM"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let period: BillingPeriod = "2024-01".parse().unwrap();
        assert_eq!(period.year(), 2024);
        assert_eq!(period.month(), 1);
        assert_eq!(period.to_string(), "2024-01");
    }

    #[test]
    fn test_rejects_invalid_periods() {
        assert!("2024-13".parse::<BillingPeriod>().is_err());
        assert!("2024-00".parse::<BillingPeriod>().is_err());
        assert!("24-01".parse::<BillingPeriod>().is_err());
        assert!("2024/01".parse::<BillingPeriod>().is_err());
        assert!("garbage".parse::<BillingPeriod>().is_err());
    }

    #[test]
    fn test_contains_date() {
        let period: BillingPeriod = "2024-01".parse().unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()));
    }

    #[test]
    fn test_matches_key() {
        let period: BillingPeriod = "2024-01".parse().unwrap();
        assert!(period.matches_key("cur-reports/cur-2024-01/cur-data.csv.gz"));
        assert!(!period.matches_key("cur-reports/cur-2024-02/cur-data.csv.gz"));
    }
}
