use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::calculator::{calculate_metrics, calculate_period, KpiMetrics};
use crate::error::KpiError;
use crate::periods::{resolve_elapsed_days, ElapsedDays, PeriodConfig};
use crate::records::{CoercionReport, VisitRecord};
use crate::types::{with_metadata, ComputationOutput, Days, PeriodResult};
use crate::KpiResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Figures typed in by the operator. Kept as free text: the snapshot shows
/// them verbatim and only the elapsed-days override is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualInputs {
    /// Visit count from the billing dashboard
    pub visits: Option<String>,
    /// AR aged 31–60 days
    pub ar_31_60: Option<String>,
    /// AR aged 61–90 days
    pub ar_61_90: Option<String>,
    /// Days elapsed in the current year; falls back to the as-of date
    pub days_elapsed: Option<String>,
}

/// Everything one report run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiReportInput {
    pub records: Vec<VisitRecord>,
    #[serde(default)]
    pub manual: ManualInputs,
    #[serde(default)]
    pub config: PeriodConfig,
    /// Stands in for "today": closes the elapsed year's window
    pub as_of: NaiveDate,
    /// Coercion losses from normalization, surfaced as warnings
    #[serde(default)]
    pub coercion: CoercionReport,
}

/// All-time metrics plus the operator's figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub visits: Option<String>,
    pub ar_31_60: Option<String>,
    pub ar_61_90: Option<String>,
    pub metrics: KpiMetrics,
}

/// One row of the quarterly or yearly table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub label: String,
    /// First day of the window
    pub first_day: NaiveDate,
    /// Last day of the window, inclusive
    pub last_day: NaiveDate,
    pub result: PeriodResult<KpiMetrics>,
}

/// The three report tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub snapshot: SnapshotReport,
    pub quarterly: Vec<PeriodRow>,
    pub yearly: Vec<PeriodRow>,
    /// Present when the configuration has an elapsed year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_days: Option<ElapsedDays>,
}

#[derive(Serialize)]
struct ReportAssumptions<'a> {
    record_count: usize,
    as_of: NaiveDate,
    config: &'a PeriodConfig,
    manual: &'a ManualInputs,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the snapshot, quarterly and yearly tables in one run.
pub fn build_report(input: &KpiReportInput) -> KpiResult<ComputationOutput<KpiReport>> {
    let start = Instant::now();
    input.config.validate()?;

    let mut warnings = input.coercion.warnings();

    let elapsed_days = match input.config.elapsed_year() {
        Some(y) => {
            let resolved =
                resolve_elapsed_days(input.manual.days_elapsed.as_deref(), y.year, input.as_of)?;
            if let Some(ref bad) = resolved.rejected_override {
                warnings.push(format!(
                    "Days-elapsed override '{}' is not a positive whole number; using {} day(s) elapsed in {}.",
                    bad, resolved.days, y.year
                ));
            }
            if resolved.days == 0 {
                warnings.push(format!(
                    "No days have elapsed in {} as of {}; its Days in AR is reported as 0.",
                    y.year, input.as_of
                ));
            }
            Some(resolved)
        }
        None => None,
    };

    let snapshot = build_snapshot(&input.records, &input.manual, &input.config);
    let quarterly = build_quarterly(&input.records, &input.config)?;
    let yearly = build_yearly(
        &input.records,
        &input.config,
        input.as_of,
        elapsed_days.as_ref().map_or(0, |e| e.days),
    )?;

    let output = KpiReport {
        snapshot,
        quarterly,
        yearly,
        elapsed_days,
    };

    let assumptions = ReportAssumptions {
        record_count: input.records.len(),
        as_of: input.as_of,
        config: &input.config,
        manual: &input.manual,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Revenue-cycle KPIs (snapshot, quarterly, yearly)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// All-time metrics over every record, dated or not.
///
/// Always computed: an empty record set reports zeros rather than N/A.
pub fn build_snapshot(
    records: &[VisitRecord],
    manual: &ManualInputs,
    config: &PeriodConfig,
) -> SnapshotReport {
    let metrics = calculate_metrics(records, config.snapshot_days, config.denial_vs_resolution);
    debug!(records = metrics.records, charges = %metrics.charges, "snapshot computed");

    SnapshotReport {
        visits: manual.visits.clone(),
        ar_31_60: manual.ar_31_60.clone(),
        ar_61_90: manual.ar_61_90.clone(),
        metrics,
    }
}

/// One row per configured quarter, in configured order.
pub fn build_quarterly(
    records: &[VisitRecord],
    config: &PeriodConfig,
) -> KpiResult<Vec<PeriodRow>> {
    config
        .quarters
        .iter()
        .map(|q| {
            let (first_day, last_day) = q.bounds()?;
            let days = q.days()?;
            let in_quarter = records
                .iter()
                .filter(|r| r.visit_date.is_some_and(|d| q.contains(d)));
            let result = calculate_period(in_quarter, days, config.denial_vs_resolution);
            log_row(&q.label(), days, &result);

            Ok(PeriodRow {
                label: q.label(),
                first_day,
                last_day,
                result,
            })
        })
        .collect()
}

/// One row per configured year, in configured order.
///
/// `elapsed_days` is the denominator for the elapsed year and is ignored for
/// fixed years.
pub fn build_yearly(
    records: &[VisitRecord],
    config: &PeriodConfig,
    as_of: NaiveDate,
    elapsed_days: Days,
) -> KpiResult<Vec<PeriodRow>> {
    config
        .years
        .iter()
        .map(|y| {
            let (start, end) = y.bounds(as_of)?;
            let last_day = end
                .pred_opt()
                .ok_or_else(|| KpiError::DateError(format!("{} has no last day", y.label())))?;
            let days = y.days_in_period(elapsed_days);
            let in_year = records
                .iter()
                .filter(|r| r.visit_date.is_some_and(|d| d >= start && d < end));
            let result = calculate_period(in_year, days, config.denial_vs_resolution);
            log_row(&y.label(), days, &result);

            Ok(PeriodRow {
                label: y.label(),
                first_day: start,
                last_day,
                result,
            })
        })
        .collect()
}

fn log_row(label: &str, days: Days, result: &PeriodResult<KpiMetrics>) {
    match result.computed() {
        Some(m) => debug!(
            period = label,
            days,
            records = m.records,
            charges = %m.charges,
            days_in_ar = m.days_in_ar,
            "period computed"
        ),
        None => debug!(period = label, "no records in period"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periods::{QuarterSpec, YearSpec};
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn visit(date: Option<NaiveDate>, charge: rust_decimal::Decimal) -> VisitRecord {
        VisitRecord {
            visit_id: Some(format!("V-{charge}")),
            visit_date: date,
            visit_status: Some("Claim Created".into()),
            charge,
            balance: charge / dec!(10),
            ..Default::default()
        }
    }

    #[test]
    fn test_undated_records_only_in_snapshot() {
        let records = vec![visit(None, dec!(500)), visit(Some(ymd(2024, 5, 1)), dec!(100))];
        let cfg = PeriodConfig::default();

        let snap = build_snapshot(&records, &ManualInputs::default(), &cfg);
        assert_eq!(snap.metrics.charges, dec!(600));

        let quarterly = build_quarterly(&records, &cfg).unwrap();
        let q2 = quarterly[1].result.computed().unwrap();
        assert_eq!(quarterly[1].label, "2024 Q2");
        assert_eq!(q2.charges, dec!(100));

        let yearly = build_yearly(&records, &cfg, ymd(2025, 6, 30), 180).unwrap();
        assert_eq!(yearly[1].result.computed().unwrap().charges, dec!(100));
        assert!(yearly[0].result.is_not_applicable());
        assert!(yearly[2].result.is_not_applicable());
    }

    #[test]
    fn test_quarter_outside_enumeration_is_excluded() {
        let records = vec![visit(Some(ymd(2023, 11, 5)), dec!(100))];
        let cfg = PeriodConfig::default();

        let quarterly = build_quarterly(&records, &cfg).unwrap();
        assert_eq!(quarterly.len(), 7);
        assert!(quarterly.iter().all(|r| r.result.is_not_applicable()));

        let yearly = build_yearly(&records, &cfg, ymd(2025, 6, 30), 180).unwrap();
        assert_eq!(yearly[0].result.computed().unwrap().charges, dec!(100));
    }

    #[test]
    fn test_records_on_period_edges() {
        let records = vec![
            visit(Some(ymd(2023, 12, 31)), dec!(100)),
            visit(Some(ymd(2024, 1, 1)), dec!(200)),
            visit(Some(ymd(2024, 3, 31)), dec!(400)),
            visit(Some(ymd(2024, 4, 1)), dec!(800)),
        ];
        let cfg = PeriodConfig::default();

        let quarterly = build_quarterly(&records, &cfg).unwrap();
        let q1 = quarterly[0].result.computed().unwrap();
        assert_eq!(quarterly[0].last_day, ymd(2024, 3, 31));
        assert_eq!(q1.records, 2);
        assert_eq!(q1.charges, dec!(600));
        assert_eq!(quarterly[1].result.computed().unwrap().charges, dec!(800));

        let yearly = build_yearly(&records, &cfg, ymd(2025, 6, 30), 180).unwrap();
        assert_eq!(yearly[0].last_day, ymd(2023, 12, 31));
        assert_eq!(yearly[0].result.computed().unwrap().charges, dec!(100));
        assert_eq!(yearly[1].first_day, ymd(2024, 1, 1));
        assert_eq!(yearly[1].result.computed().unwrap().charges, dec!(1400));
    }

    #[test]
    fn test_elapsed_year_window_stops_at_as_of() {
        let records = vec![
            visit(Some(ymd(2025, 3, 10)), dec!(100)),
            visit(Some(ymd(2025, 3, 11)), dec!(200)),
        ];
        let cfg = PeriodConfig {
            years: vec![YearSpec::elapsed(2025)],
            ..Default::default()
        };

        let yearly = build_yearly(&records, &cfg, ymd(2025, 3, 10), 68).unwrap();
        let row = &yearly[0];
        assert_eq!(row.last_day, ymd(2025, 3, 10));
        let m = row.result.computed().unwrap();
        assert_eq!(m.charges, dec!(100));
        assert_eq!(m.days_in_period, 68);
    }

    #[test]
    fn test_report_warns_on_rejected_override() {
        let input = KpiReportInput {
            records: vec![visit(Some(ymd(2025, 2, 1)), dec!(100))],
            manual: ManualInputs {
                days_elapsed: Some("soon".into()),
                ..Default::default()
            },
            config: PeriodConfig::default(),
            as_of: ymd(2025, 3, 1),
            coercion: CoercionReport::default(),
        };
        let out = build_report(&input).unwrap();
        assert_eq!(out.result.elapsed_days.as_ref().unwrap().days, 59);
        assert!(out.warnings.iter().any(|w| w.contains("'soon'")));
    }

    #[test]
    fn test_report_rejects_invalid_config() {
        let input = KpiReportInput {
            records: Vec::new(),
            manual: ManualInputs::default(),
            config: PeriodConfig {
                quarters: vec![QuarterSpec { year: 2024, quarter: 9 }],
                ..Default::default()
            },
            as_of: ymd(2025, 3, 1),
            coercion: CoercionReport::default(),
        };
        assert!(build_report(&input).is_err());
    }
}
