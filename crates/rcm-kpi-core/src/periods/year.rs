use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ymd;
use crate::error::KpiError;
use crate::types::Days;
use crate::KpiResult;

/// Day count used as the AR-aging denominator for a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearDays {
    /// A closed year with a fixed count (365 or 366)
    Fixed(Days),
    /// The current, still-growing year: elapsed days up to the as-of date
    Elapsed,
}

/// A target year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpec {
    pub year: i32,
    pub days: YearDays,
}

impl YearSpec {
    pub fn fixed(year: i32, days: Days) -> Self {
        Self {
            year,
            days: YearDays::Fixed(days),
        }
    }

    pub fn elapsed(year: i32) -> Self {
        Self {
            year,
            days: YearDays::Elapsed,
        }
    }

    pub fn label(&self) -> String {
        self.year.to_string()
    }

    pub fn is_elapsed(&self) -> bool {
        matches!(self.days, YearDays::Elapsed)
    }

    /// Half-open `[start, end)` window of visit dates for this year.
    ///
    /// A fixed year ends at Jan 1 of the next year. The elapsed year ends the
    /// day after `as_of` (so the as-of day itself is included), capped at the
    /// next Jan 1.
    pub fn bounds(&self, as_of: NaiveDate) -> KpiResult<(NaiveDate, NaiveDate)> {
        let start = ymd(self.year, 1, 1)?;
        let next_year = ymd(self.year + 1, 1, 1)?;
        let end = match self.days {
            YearDays::Fixed(_) => next_year,
            YearDays::Elapsed => {
                let after_as_of = as_of.succ_opt().ok_or_else(|| {
                    KpiError::DateError(format!("as-of date {as_of} has no successor"))
                })?;
                after_as_of.min(next_year)
            }
        };
        Ok((start, end))
    }

    /// Denominator for average daily charges.
    pub fn days_in_period(&self, elapsed: Days) -> Days {
        match self.days {
            YearDays::Fixed(d) => d,
            YearDays::Elapsed => elapsed,
        }
    }
}

/// Resolved elapsed-day count for the current year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedDays {
    pub days: Days,
    /// True when the caller's override was used
    pub overridden: bool,
    /// Override text that was present but unusable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_override: Option<String>,
}

/// Resolve the elapsed-day count for `year`.
///
/// A positive integer override wins. Zero and negative overrides fall back
/// like any other unusable text; the legacy report passed them through as-is.
/// Otherwise the count is the number of days from Jan 1 of `year` to `as_of`
/// (capped at the next Jan 1, floored at zero), so Jan 2 gives 1.
pub fn resolve_elapsed_days(
    override_text: Option<&str>,
    year: i32,
    as_of: NaiveDate,
) -> KpiResult<ElapsedDays> {
    let text = override_text.map(str::trim).filter(|t| !t.is_empty());

    if let Some(t) = text {
        match t.parse::<i64>() {
            Ok(n) if n > 0 && n <= Days::MAX as i64 => {
                return Ok(ElapsedDays {
                    days: n as Days,
                    overridden: true,
                    rejected_override: None,
                });
            }
            _ => warn!(value = t, "ignoring invalid elapsed-days override"),
        }
    }

    let start = ymd(year, 1, 1)?;
    let next_year = ymd(year + 1, 1, 1)?;
    let elapsed = (as_of.min(next_year) - start).num_days().max(0);

    Ok(ElapsedDays {
        days: elapsed as Days,
        overridden: false,
        rejected_override: text.map(str::to_string),
    })
}
