pub mod config;
pub mod quarter;
pub mod year;

use chrono::NaiveDate;

use crate::error::KpiError;
use crate::KpiResult;

pub use config::{PeriodConfig, DEFAULT_DENIAL_VS_RESOLUTION, DEFAULT_SNAPSHOT_DAYS};
pub use quarter::{quarter_label, quarter_of, QuarterSpec};
pub use year::{resolve_elapsed_days, ElapsedDays, YearDays, YearSpec};

/// Checked calendar date constructor.
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> KpiResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| KpiError::DateError(format!("{year:04}-{month:02}-{day:02} is not a valid date")))
}
