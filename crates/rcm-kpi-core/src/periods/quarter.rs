use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ymd;
use crate::error::KpiError;
use crate::types::Days;
use crate::KpiResult;

/// Calendar quarter (1–4) of a date: `floor((month - 1) / 3) + 1`.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Quarter label of a date, e.g. `"2024 Q1"`.
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{} Q{}", date.year(), quarter_of(date))
}

/// A target quarter. Serialized as its label (`"2025 Q3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuarterSpec {
    pub year: i32,
    pub quarter: u32,
}

impl QuarterSpec {
    pub fn new(year: i32, quarter: u32) -> KpiResult<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(KpiError::InvalidPeriod(format!(
                "quarter must be 1-4, got {quarter} for year {year}"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Parse a `"{year} Q{n}"` label. The `Q` may be lower case.
    pub fn parse(label: &str) -> KpiResult<Self> {
        let invalid = || KpiError::InvalidPeriod(format!("'{label}' is not a '<year> Q<n>' label"));

        let mut parts = label.split_whitespace();
        let (year, q) = match (parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(q), None) => (y, q),
            _ => return Err(invalid()),
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let quarter: u32 = q
            .strip_prefix(|c: char| c == 'Q' || c == 'q')
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?;

        Self::new(year, quarter)
    }

    pub fn label(&self) -> String {
        format!("{} Q{}", self.year, self.quarter)
    }

    /// First and last day of the quarter, both inclusive.
    ///
    /// The last day is the first day plus three calendar months minus one day.
    pub fn bounds(&self) -> KpiResult<(NaiveDate, NaiveDate)> {
        if !(1..=4).contains(&self.quarter) {
            return Err(KpiError::InvalidPeriod(format!("{} is not a calendar quarter", self.label())));
        }
        let start = ymd(self.year, (self.quarter - 1) * 3 + 1, 1)?;
        let end = start
            .checked_add_months(Months::new(3))
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| KpiError::DateError(format!("{} end date out of range", self.label())))?;
        Ok((start, end))
    }

    /// Days in the quarter, counting both ends (90, 91 or 92).
    pub fn days(&self) -> KpiResult<Days> {
        let (start, end) = self.bounds()?;
        Ok(((end - start).num_days() + 1) as Days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && quarter_of(date) == self.quarter
    }
}

impl fmt::Display for QuarterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}

impl FromStr for QuarterSpec {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QuarterSpec {
    type Error = KpiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QuarterSpec> for String {
    fn from(q: QuarterSpec) -> Self {
        q.label()
    }
}
