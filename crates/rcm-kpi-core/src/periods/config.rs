use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::quarter::QuarterSpec;
use super::year::YearSpec;
use crate::error::KpiError;
use crate::types::{Days, Percent};
use crate::KpiResult;

/// Day count used for the all-time snapshot's average daily charges.
pub const DEFAULT_SNAPSHOT_DAYS: Days = 365;

/// Denial-vs-resolution ratio reported on every row (85%).
pub const DEFAULT_DENIAL_VS_RESOLUTION: Percent = dec!(85);

/// Ordered period enumeration and report constants.
///
/// Rows of the quarterly and yearly tables appear in exactly the order given
/// here, whether or not any records fall in them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    pub quarters: Vec<QuarterSpec>,
    pub years: Vec<YearSpec>,
    pub snapshot_days: Days,
    /// Externally supplied, not derived from the records
    pub denial_vs_resolution: Percent,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        let quarters = [(2024, 1), (2024, 2), (2024, 3), (2024, 4), (2025, 1), (2025, 2), (2025, 3)]
            .into_iter()
            .map(|(year, quarter)| QuarterSpec { year, quarter })
            .collect();

        Self {
            quarters,
            years: vec![
                YearSpec::fixed(2023, 365),
                YearSpec::fixed(2024, 366),
                YearSpec::elapsed(2025),
            ],
            snapshot_days: DEFAULT_SNAPSHOT_DAYS,
            denial_vs_resolution: DEFAULT_DENIAL_VS_RESOLUTION,
        }
    }
}

impl PeriodConfig {
    /// The year whose window grows with the as-of date, if any.
    pub fn elapsed_year(&self) -> Option<&YearSpec> {
        self.years.iter().find(|y| y.is_elapsed())
    }

    pub fn validate(&self) -> KpiResult<()> {
        if self.snapshot_days == 0 {
            return Err(KpiError::InvalidInput {
                field: "snapshot_days".into(),
                reason: "Snapshot day count must be positive.".into(),
            });
        }
        if self.denial_vs_resolution < Decimal::ZERO {
            return Err(KpiError::InvalidInput {
                field: "denial_vs_resolution".into(),
                reason: "Denial-vs-resolution ratio cannot be negative.".into(),
            });
        }

        let mut seen = HashSet::new();
        for q in &self.quarters {
            if !(1..=4).contains(&q.quarter) {
                return Err(KpiError::InvalidPeriod(format!(
                    "quarter must be 1-4, got {} for year {}",
                    q.quarter, q.year
                )));
            }
            check_year_range(q.year, "quarters")?;
            if !seen.insert(q.label()) {
                return Err(KpiError::InvalidInput {
                    field: "quarters".into(),
                    reason: format!("Quarter '{}' is listed more than once.", q.label()),
                });
            }
        }

        let mut seen = HashSet::new();
        for y in &self.years {
            check_year_range(y.year, "years")?;
            if y.days_in_period(1) == 0 {
                return Err(KpiError::InvalidInput {
                    field: "years".into(),
                    reason: format!("Year {} has a fixed day count of zero.", y.year),
                });
            }
            if !seen.insert(y.year) {
                return Err(KpiError::InvalidInput {
                    field: "years".into(),
                    reason: format!("Year {} is listed more than once.", y.year),
                });
            }
        }

        if self.years.iter().filter(|y| y.is_elapsed()).count() > 1 {
            return Err(KpiError::InvalidInput {
                field: "years".into(),
                reason: "At most one year may use the elapsed day count.".into(),
            });
        }

        Ok(())
    }
}

fn check_year_range(year: i32, field: &str) -> KpiResult<()> {
    if !(1..=9999).contains(&year) {
        return Err(KpiError::InvalidInput {
            field: field.into(),
            reason: format!("Year {year} is outside 1-9999."),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periods::year::YearDays;

    #[test]
    fn test_default_enumeration() {
        let cfg = PeriodConfig::default();
        let labels: Vec<String> = cfg.quarters.iter().map(|q| q.label()).collect();
        assert_eq!(
            labels,
            ["2024 Q1", "2024 Q2", "2024 Q3", "2024 Q4", "2025 Q1", "2025 Q2", "2025 Q3"]
        );
        let years: Vec<i32> = cfg.years.iter().map(|y| y.year).collect();
        assert_eq!(years, [2023, 2024, 2025]);
        assert_eq!(cfg.elapsed_year().map(|y| y.year), Some(2025));
        assert_eq!(cfg.snapshot_days, 365);
        assert_eq!(cfg.denial_vs_resolution, dec!(85));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut cfg = PeriodConfig::default();
        cfg.quarters.push(QuarterSpec { year: 2024, quarter: 1 });
        assert!(matches!(cfg.validate(), Err(KpiError::InvalidInput { .. })));

        let mut cfg = PeriodConfig::default();
        cfg.years.push(YearSpec::fixed(2023, 365));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = PeriodConfig::default();
        cfg.snapshot_days = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = PeriodConfig::default();
        cfg.quarters[0].quarter = 7;
        assert!(matches!(cfg.validate(), Err(KpiError::InvalidPeriod(_))));

        let mut cfg = PeriodConfig::default();
        cfg.years[0].days = YearDays::Fixed(0);
        assert!(cfg.validate().is_err());

        let mut cfg = PeriodConfig::default();
        cfg.years[1] = YearSpec::elapsed(2024);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: PeriodConfig = serde_json::from_str(
            r#"{
                "quarters": ["2025 Q1", "2025 Q2"],
                "years": [{"year": 2024, "days": {"fixed": 366}}, {"year": 2025, "days": "elapsed"}]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.quarters.len(), 2);
        assert_eq!(cfg.years[1], YearSpec::elapsed(2025));
        assert_eq!(cfg.snapshot_days, DEFAULT_SNAPSHOT_DAYS);
        assert_eq!(cfg.denial_vs_resolution, DEFAULT_DENIAL_VS_RESOLUTION);
    }
}
