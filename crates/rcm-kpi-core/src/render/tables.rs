use serde::{Deserialize, Serialize};

use super::format::{format_currency, format_percent, format_rate, NOT_APPLICABLE};
use crate::kpi::{KpiMetrics, KpiReport, PeriodRow, SnapshotReport};
use crate::types::PeriodResult;

pub const SNAPSHOT_SHEET: &str = "Slide3";
pub const QUARTERLY_SHEET: &str = "Slide4";
pub const YEARLY_SHEET: &str = "Slide5";

pub const SNAPSHOT_COLUMNS: [&str; 2] = ["Type", "Value"];

pub const QUARTERLY_COLUMNS: [&str; 13] = [
    "Quarter",
    "Visits",
    "Charges",
    "Charges Submitted (%)",
    "Payments",
    "Gross Collection Rate (%)",
    "Net Collection Rate (%)",
    "Days in AR",
    "Billed AR",
    "Billed AR (%)",
    "Unbilled AR",
    "Unbilled AR (%)",
    "Denial vs Resolution (%)",
];

pub const YEARLY_COLUMNS: [&str; 11] = [
    "Year",
    "Visits",
    "Charges",
    "Charges Submitted (%)",
    "Payments",
    "Gross Collection Rate (%)",
    "Net Collection Rate (%)",
    "Days in AR",
    "Billed AR",
    "Unbilled AR",
    "Denial vs Resolution (%)",
];

/// A table of display-ready cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTable {
    pub name: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RenderedTable {
    fn new(name: &str, title: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// The three tables in report order.
pub fn render_report(report: &KpiReport) -> Vec<RenderedTable> {
    vec![
        render_snapshot(&report.snapshot),
        render_quarterly(&report.quarterly),
        render_yearly(&report.yearly),
    ]
}

/// Two-column `Type` / `Value` table. Operator figures are shown verbatim.
pub fn render_snapshot(snapshot: &SnapshotReport) -> RenderedTable {
    let m = &snapshot.metrics;
    let manual = |v: &Option<String>| v.clone().unwrap_or_default();

    let mut table = RenderedTable::new(SNAPSHOT_SHEET, "Current KPI Metrics", &SNAPSHOT_COLUMNS);
    let pairs = [
        ("Visits", manual(&snapshot.visits)),
        ("Charges", format_currency(m.charges)),
        ("Charges Submitted (%)", format_percent(m.charges_submitted_pct)),
        ("Payments", format_currency(m.payments)),
        ("Gross Collection Rate (%)", format_percent(m.gross_collection_rate)),
        ("Net Collection Rate (%)", format_percent(m.net_collection_rate)),
        ("Days in AR (DAR)", m.days_in_ar.to_string()),
        ("A/R (31–60 Days)", manual(&snapshot.ar_31_60)),
        ("A/R (61–90 Days)", manual(&snapshot.ar_61_90)),
        ("Denial vs Resolution", format_rate(m.denial_vs_resolution)),
    ];
    table.rows = pairs
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v])
        .collect();
    table
}

/// Quarterly table: label plus 12 cells, all `N/A` for an empty quarter.
pub fn render_quarterly(rows: &[PeriodRow]) -> RenderedTable {
    let mut table =
        RenderedTable::new(QUARTERLY_SHEET, "Quarterly KPI Metrics", &QUARTERLY_COLUMNS);
    table.rows = rows
        .iter()
        .map(|row| {
            render_row(&row.label, &row.result, QUARTERLY_COLUMNS.len(), |m| {
                let mut cells = leading_cells(m);
                cells.extend([
                    format_currency(m.billed_ar),
                    format_percent(m.billed_ar_pct),
                    format_currency(m.unbilled_ar),
                    format_percent(m.unbilled_ar_pct),
                    format_rate(m.denial_vs_resolution),
                ]);
                cells
            })
        })
        .collect();
    table
}

/// Yearly table: label plus 10 cells, all `N/A` for an empty year.
pub fn render_yearly(rows: &[PeriodRow]) -> RenderedTable {
    let mut table = RenderedTable::new(YEARLY_SHEET, "Yearly KPI Metrics", &YEARLY_COLUMNS);
    table.rows = rows
        .iter()
        .map(|row| {
            render_row(&row.label, &row.result, YEARLY_COLUMNS.len(), |m| {
                let mut cells = leading_cells(m);
                cells.extend([
                    format_currency(m.billed_ar),
                    format_currency(m.unbilled_ar),
                    format_rate(m.denial_vs_resolution),
                ]);
                cells
            })
        })
        .collect();
    table
}

fn render_row<F>(label: &str, result: &PeriodResult<KpiMetrics>, width: usize, cells: F) -> Vec<String>
where
    F: Fn(&KpiMetrics) -> Vec<String>,
{
    let mut row = vec![label.to_string()];
    match result {
        PeriodResult::Computed(m) => row.extend(cells(m)),
        PeriodResult::NotApplicable => {
            row.extend(std::iter::repeat(NOT_APPLICABLE.to_string()).take(width - 1))
        }
    }
    row
}

/// Visits through Days in AR, shared by the quarterly and yearly tables.
fn leading_cells(m: &KpiMetrics) -> Vec<String> {
    vec![
        m.visits.to_string(),
        format_currency(m.charges),
        format_percent(m.charges_submitted_pct),
        format_currency(m.payments),
        format_percent(m.gross_collection_rate),
        format_percent(m.net_collection_rate),
        m.days_in_ar.to_string(),
    ]
}
