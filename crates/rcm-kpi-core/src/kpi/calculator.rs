use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::records::VisitRecord;
use crate::types::{Days, Money, Percent, PeriodResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// KPI row for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMetrics {
    /// Distinct non-blank visit IDs
    pub visits: u64,
    /// Records that fell in the period
    pub records: u64,
    pub charges: Money,
    pub expected: Money,
    /// Primary + secondary + tertiary + patient payments
    pub payments: Money,
    /// Charges on visits with status "claim created"
    pub submitted_charges: Money,
    pub charges_submitted_pct: Percent,
    /// Payments / charges
    pub gross_collection_rate: Percent,
    /// Payments / expected
    pub net_collection_rate: Percent,
    pub days_in_period: Days,
    /// Charges / days in period
    pub avg_daily_charges: Money,
    /// Total AR / average daily charges, rounded to whole days
    pub days_in_ar: i64,
    pub total_ar: Money,
    pub billed_ar: Money,
    pub billed_ar_pct: Percent,
    pub unbilled_ar: Money,
    pub unbilled_ar_pct: Percent,
    pub denial_vs_resolution: Percent,
}

/// Running sums over a record subset.
#[derive(Debug, Default)]
struct Totals<'a> {
    records: u64,
    visit_ids: HashSet<&'a str>,
    charges: Money,
    expected: Money,
    payments: Money,
    submitted_charges: Money,
    billed_ar: Money,
    unbilled_ar: Money,
}

impl<'a> Totals<'a> {
    fn add(&mut self, r: &'a VisitRecord) {
        self.records += 1;
        if let Some(id) = r.visit_key() {
            self.visit_ids.insert(id);
        }
        self.charges += r.charge;
        self.expected += r.expected;
        self.payments += r.payment_total();
        if r.is_billed() {
            self.submitted_charges += r.charge;
            self.billed_ar += r.balance;
        } else {
            self.unbilled_ar += r.balance;
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the KPI row for a record subset.
///
/// Never fails: every ratio with a zero denominator reports zero.
pub fn calculate_metrics<'a, I>(
    records: I,
    days_in_period: Days,
    denial_vs_resolution: Percent,
) -> KpiMetrics
where
    I: IntoIterator<Item = &'a VisitRecord>,
{
    let mut t = Totals::default();
    for r in records {
        t.add(r);
    }

    let avg_daily_charges = if t.charges.is_zero() || days_in_period == 0 {
        Decimal::ZERO
    } else {
        t.charges / Decimal::from(days_in_period)
    };

    let total_ar = t.billed_ar + t.unbilled_ar;

    KpiMetrics {
        visits: t.visit_ids.len() as u64,
        records: t.records,
        charges: t.charges,
        expected: t.expected,
        payments: t.payments,
        submitted_charges: t.submitted_charges,
        charges_submitted_pct: percentage(t.submitted_charges, t.charges),
        gross_collection_rate: percentage(t.payments, t.charges),
        net_collection_rate: percentage(t.payments, t.expected),
        days_in_period,
        avg_daily_charges,
        days_in_ar: days_in_ar(total_ar, avg_daily_charges),
        total_ar,
        billed_ar: t.billed_ar,
        billed_ar_pct: percentage(t.billed_ar, total_ar),
        unbilled_ar: t.unbilled_ar,
        unbilled_ar_pct: percentage(t.unbilled_ar, total_ar),
        denial_vs_resolution,
    }
}

/// Like [`calculate_metrics`], but a subset with no records is
/// `NotApplicable` rather than a row of zeros.
pub fn calculate_period<'a, I>(
    records: I,
    days_in_period: Days,
    denial_vs_resolution: Percent,
) -> PeriodResult<KpiMetrics>
where
    I: IntoIterator<Item = &'a VisitRecord>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return PeriodResult::NotApplicable;
    }
    PeriodResult::Computed(calculate_metrics(
        records,
        days_in_period,
        denial_vs_resolution,
    ))
}

/// `numerator / denominator * 100` rounded half-to-even at 2 dp; zero when
/// the denominator is zero.
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|pct| pct.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .unwrap_or(Decimal::ZERO)
}

/// Outstanding AR divided by average daily charges, rounded half-to-even to
/// whole days; zero when there are no daily charges.
pub fn days_in_ar(total_ar: Money, avg_daily_charges: Money) -> i64 {
    if avg_daily_charges.is_zero() {
        return 0;
    }
    total_ar
        .checked_div(avg_daily_charges)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_i64())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(id: &str, status: &str, charge: Decimal, balance: Decimal) -> VisitRecord {
        VisitRecord {
            visit_id: Some(id.into()),
            visit_date: NaiveDate::from_ymd_opt(2024, 2, 15),
            visit_status: Some(status.into()),
            charge,
            expected: charge * dec!(0.8),
            primary_payment: charge * dec!(0.5),
            balance,
            ..Default::default()
        }
    }

    #[test]
    fn test_percentage_rounds_half_even() {
        assert_eq!(percentage(dec!(90), dec!(80)), dec!(112.50));
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(percentage(dec!(2), dec!(3)), dec!(66.67));
        // 0.00125 * 100 = 0.125, exact midpoint
        assert_eq!(percentage(dec!(0.00125), dec!(1)), dec!(0.12));
        assert_eq!(percentage(dec!(0.00135), dec!(1)), dec!(0.14));
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_days_in_ar() {
        // 3650 charges over 365 days = 10/day; 250 outstanding = 25 days
        assert_eq!(days_in_ar(dec!(250), dec!(10)), 25);
        assert_eq!(days_in_ar(dec!(255), dec!(10)), 26);
        assert_eq!(days_in_ar(dec!(245), dec!(10)), 24);
        assert_eq!(days_in_ar(dec!(100), Decimal::ZERO), 0);
    }

    #[test]
    fn test_single_record_metrics() {
        let r = VisitRecord {
            visit_id: Some("V1".into()),
            visit_date: NaiveDate::from_ymd_opt(2024, 2, 15),
            visit_status: Some("Claim Created".into()),
            charge: dec!(100),
            expected: dec!(80),
            primary_payment: dec!(60),
            secondary_payment: dec!(20),
            tertiary_payment: dec!(0),
            patient_payment: dec!(10),
            balance: dec!(10),
        };
        let m = calculate_metrics([&r], 91, dec!(85));

        assert_eq!(m.visits, 1);
        assert_eq!(m.payments, dec!(90));
        assert_eq!(m.charges_submitted_pct, dec!(100));
        assert_eq!(m.gross_collection_rate, dec!(90));
        assert_eq!(m.net_collection_rate, dec!(112.5));
        assert_eq!(m.billed_ar, dec!(10));
        assert_eq!(m.unbilled_ar, Decimal::ZERO);
        assert_eq!(m.billed_ar_pct, dec!(100));
        assert_eq!(m.unbilled_ar_pct, Decimal::ZERO);
        // 100 / 91 per day; 10 outstanding ≈ 9.1 days
        assert_eq!(m.days_in_ar, 9);
        assert_eq!(m.denial_vs_resolution, dec!(85));
    }

    #[test]
    fn test_billed_unbilled_partition() {
        let records = vec![
            record("A", "Claim Created", dec!(200), dec!(40)),
            record("B", "claim created", dec!(100), dec!(15)),
            record("C", "Draft", dec!(50), dec!(25)),
            record("C", "Review", dec!(50), dec!(20)),
        ];
        let m = calculate_metrics(&records, 365, dec!(85));

        assert_eq!(m.visits, 3);
        assert_eq!(m.records, 4);
        assert_eq!(m.submitted_charges, dec!(300));
        assert_eq!(m.billed_ar, dec!(55));
        assert_eq!(m.unbilled_ar, dec!(45));
        assert_eq!(m.total_ar, dec!(100));
        assert_eq!(m.billed_ar + m.unbilled_ar, records.iter().map(|r| r.balance).sum::<Decimal>());
        assert_eq!(m.billed_ar_pct, dec!(55));
        assert_eq!(m.unbilled_ar_pct, dec!(45));
        assert_eq!(m.charges_submitted_pct, dec!(75));
    }

    #[test]
    fn test_zero_charges_yields_zero_ratios() {
        let r = VisitRecord {
            visit_status: Some("Open".into()),
            balance: dec!(30),
            ..Default::default()
        };
        let m = calculate_metrics([&r], 365, dec!(85));
        assert_eq!(m.charges, Decimal::ZERO);
        assert_eq!(m.gross_collection_rate, Decimal::ZERO);
        assert_eq!(m.net_collection_rate, Decimal::ZERO);
        assert_eq!(m.avg_daily_charges, Decimal::ZERO);
        assert_eq!(m.days_in_ar, 0);
        assert_eq!(m.unbilled_ar_pct, dec!(100));
        assert_eq!(m.visits, 0);
    }

    #[test]
    fn test_zero_day_period_does_not_divide() {
        let r = record("A", "Claim Created", dec!(100), dec!(50));
        let m = calculate_metrics([&r], 0, dec!(85));
        assert_eq!(m.avg_daily_charges, Decimal::ZERO);
        assert_eq!(m.days_in_ar, 0);
    }

    #[test]
    fn test_calculate_period_empty_is_not_applicable() {
        let none: Vec<VisitRecord> = Vec::new();
        assert_eq!(calculate_period(&none, 90, dec!(85)), PeriodResult::NotApplicable);

        let one = vec![record("A", "Open", Decimal::ZERO, Decimal::ZERO)];
        assert!(calculate_period(&one, 90, dec!(85)).computed().is_some());
    }
}
