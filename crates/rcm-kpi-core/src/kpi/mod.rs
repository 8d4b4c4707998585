pub mod calculator;
pub mod report;

pub use calculator::{calculate_metrics, calculate_period, days_in_ar, percentage, KpiMetrics};
pub use report::{
    build_quarterly, build_report, build_snapshot, build_yearly, KpiReport, KpiReportInput,
    ManualInputs, PeriodRow, SnapshotReport,
};
