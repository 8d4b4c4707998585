use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

use super::visit::{RawVisitRow, VisitRecord};
use crate::types::Money;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Counts of values that could not be coerced. Rows are never dropped, so
/// these are the only trace of lossy input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoercionReport {
    /// Rows read
    pub rows: usize,
    /// Rows with no usable visit date (blank or unparseable)
    pub undated_rows: usize,
    /// Non-blank visit dates that failed to parse
    pub invalid_dates: usize,
    /// Non-blank amounts that failed to parse, keyed by source column
    pub invalid_amounts: BTreeMap<String, usize>,
}

impl CoercionReport {
    /// Human-readable warnings for the computation envelope.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.invalid_dates > 0 {
            warnings.push(format!(
                "{} row(s) have an unparseable Visit Date; they count toward the snapshot only.",
                self.invalid_dates
            ));
        }
        let blank_dates = self.undated_rows - self.invalid_dates;
        if blank_dates > 0 {
            warnings.push(format!(
                "{} row(s) have no Visit Date; they count toward the snapshot only.",
                blank_dates
            ));
        }
        for (column, count) in &self.invalid_amounts {
            warnings.push(format!(
                "{} non-numeric or out-of-range value(s) in '{}' treated as 0.",
                count, column
            ));
        }
        warnings
    }
}

/// Coerced records plus the coercion report.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecords {
    pub records: Vec<VisitRecord>,
    pub report: CoercionReport,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Coerce raw export rows into visit records.
///
/// Unparseable amounts become zero and unparseable dates become `None`.
/// Every input row produces exactly one record.
pub fn normalize_rows<I>(rows: I) -> NormalizedRecords
where
    I: IntoIterator<Item = RawVisitRow>,
{
    let mut report = CoercionReport::default();
    let records: Vec<VisitRecord> = rows
        .into_iter()
        .map(|row| normalize_row(row, &mut report))
        .collect();

    debug!(
        rows = report.rows,
        undated = report.undated_rows,
        invalid_dates = report.invalid_dates,
        "normalized visit rows"
    );
    if report.invalid_dates > 0 || !report.invalid_amounts.is_empty() {
        warn!(
            invalid_dates = report.invalid_dates,
            invalid_amount_columns = report.invalid_amounts.len(),
            "lossy coercion in visit export"
        );
    }

    NormalizedRecords { records, report }
}

/// Coerce a monetary cell. Blank, `nan`, unparseable text and magnitudes above
/// one quadrillion all read as zero.
pub fn parse_amount(text: Option<&str>) -> Money {
    text.and_then(try_parse_amount).unwrap_or(Decimal::ZERO)
}

/// Parse a visit date. Time components are accepted and discarded.
///
/// Accepted shapes: `2024-02-15`, `2024-02-15 08:30:00(.fff)`,
/// `2024-02-15T08:30:00`, RFC 3339, `02/15/2024`, `2/15/24`, `2024/02/15`,
/// each of the slash forms optionally followed by a time.
pub fn parse_visit_date(text: Option<&str>) -> Option<NaiveDate> {
    let t = non_blank(text)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive());
    }

    // Strip any time-of-day suffix; the date part decides the bucket.
    let date_part = t
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(t);

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            // `%Y` happily reads "24" as year 24; leave two-digit years to `%y`.
            if fmt != "%m/%d/%y" && d.year() < 1000 {
                continue;
            }
            return Some(d);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Largest magnitude accepted for a single amount cell. Anything bigger is
/// treated like unparseable text so column sums stay inside `Decimal` range.
const MAX_AMOUNT: Decimal = dec!(1000000000000000);

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m/%d/%y"];

fn normalize_row(row: RawVisitRow, report: &mut CoercionReport) -> VisitRecord {
    report.rows += 1;

    let visit_date = parse_visit_date(row.visit_date.as_deref());
    if visit_date.is_none() {
        report.undated_rows += 1;
        if non_blank(row.visit_date.as_deref()).is_some() {
            report.invalid_dates += 1;
        }
    }

    let mut amount = |column: &str, cell: &Option<String>| -> Money {
        match non_blank(cell.as_deref()) {
            None => Decimal::ZERO,
            Some(t) => try_parse_amount(t).unwrap_or_else(|| {
                *report.invalid_amounts.entry(column.to_string()).or_insert(0) += 1;
                Decimal::ZERO
            }),
        }
    };

    let charge = amount("Charge", &row.charge);
    let expected = amount("Expected", &row.expected);
    let primary_payment = amount("Primary Payment", &row.primary_payment);
    let secondary_payment = amount("Secondary Payment", &row.secondary_payment);
    let tertiary_payment = amount("Tertiary Payment", &row.tertiary_payment);
    let patient_payment = amount("Patient Payment", &row.patient_payment);
    let balance = amount("Balance", &row.balance);

    VisitRecord {
        visit_id: row.visit_id.filter(|s| !s.trim().is_empty()),
        visit_date,
        visit_status: row.visit_status,
        charge,
        expected,
        primary_payment,
        secondary_payment,
        tertiary_payment,
        patient_payment,
        balance,
    }
}

/// Trimmed text, or `None` for blank and `nan` cells.
fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("nan"))
}

fn try_parse_amount(text: &str) -> Option<Money> {
    let t = non_blank(Some(text))?;
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .ok()
        .filter(|d| d.abs() <= MAX_AMOUNT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_amount_plain_and_scientific() {
        assert_eq!(parse_amount(Some("125.50")), dec!(125.50));
        assert_eq!(parse_amount(Some("  -40 ")), dec!(-40));
        assert_eq!(parse_amount(Some("1.5e2")), dec!(150));
    }

    #[test]
    fn test_parse_amount_garbage_is_zero() {
        assert_eq!(parse_amount(None), Decimal::ZERO);
        assert_eq!(parse_amount(Some("")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("NaN")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("$1,200.00")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("pending")), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_out_of_range_is_zero() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert_eq!(parse_amount(Some("1e15")), dec!(1000000000000000));
        assert_eq!(parse_amount(Some("5e28")), Decimal::ZERO);
        assert_eq!(parse_amount(Some("-2e16")), Decimal::ZERO);
    }

    #[test]
    fn test_huge_amounts_counted_as_invalid() {
        let rows = vec![
            RawVisitRow {
                charge: Some("5e28".into()),
                ..Default::default()
            },
            RawVisitRow {
                charge: Some("5e28".into()),
                balance: Some("40".into()),
                ..Default::default()
            },
        ];
        let out = normalize_rows(rows);
        assert_eq!(out.report.invalid_amounts.get("Charge"), Some(&2));
        assert!(out.records.iter().all(|r| r.charge.is_zero()));
        assert_eq!(out.records[1].balance, dec!(40));
    }

    #[test]
    fn test_parse_visit_date_shapes() {
        let expected = Some(ymd(2024, 2, 15));
        assert_eq!(parse_visit_date(Some("2024-02-15")), expected);
        assert_eq!(parse_visit_date(Some("2024-02-15 00:00:00")), expected);
        assert_eq!(parse_visit_date(Some("2024-02-15 13:45:10.250")), expected);
        assert_eq!(parse_visit_date(Some("2024-02-15T08:30:00")), expected);
        assert_eq!(parse_visit_date(Some("2024-02-15T08:30:00Z")), expected);
        assert_eq!(parse_visit_date(Some("02/15/2024")), expected);
        assert_eq!(parse_visit_date(Some("2/15/2024 10:00")), expected);
        assert_eq!(parse_visit_date(Some("2024/02/15")), expected);
        assert_eq!(parse_visit_date(Some("02/15/24")), expected);
    }

    #[test]
    fn test_parse_visit_date_failures_are_none() {
        assert_eq!(parse_visit_date(None), None);
        assert_eq!(parse_visit_date(Some("  ")), None);
        assert_eq!(parse_visit_date(Some("not a date")), None);
        assert_eq!(parse_visit_date(Some("2024-13-01")), None);
        assert_eq!(parse_visit_date(Some("02/30/2024")), None);
        // Four-digit formats refuse short years; only `%m/%d/%y` takes them.
        assert_eq!(parse_visit_date(Some("24-02-15")), None);
        assert_eq!(parse_visit_date(Some("2/15/0024")), None);
    }

    #[test]
    fn test_normalize_keeps_every_row() {
        let rows = vec![
            RawVisitRow {
                visit_date: Some("2024-01-10".into()),
                charge: Some("100".into()),
                ..Default::default()
            },
            RawVisitRow {
                visit_date: Some("garbage".into()),
                charge: Some("abc".into()),
                balance: Some("12.5".into()),
                ..Default::default()
            },
            RawVisitRow::default(),
        ];

        let out = normalize_rows(rows);
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.report.rows, 3);
        assert_eq!(out.report.undated_rows, 2);
        assert_eq!(out.report.invalid_dates, 1);
        assert_eq!(out.report.invalid_amounts.get("Charge"), Some(&1));

        assert_eq!(out.records[1].charge, Decimal::ZERO);
        assert_eq!(out.records[1].balance, dec!(12.5));
        assert_eq!(out.records[1].visit_date, None);
    }

    #[test]
    fn test_coercion_warnings() {
        let rows = vec![
            RawVisitRow {
                visit_date: Some("bad".into()),
                expected: Some("n/a".into()),
                ..Default::default()
            },
            RawVisitRow::default(),
        ];
        let warnings = normalize_rows(rows).report.warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("unparseable Visit Date"));
        assert!(warnings[1].contains("no Visit Date"));
        assert!(warnings[2].contains("'Expected'"));
    }
}
