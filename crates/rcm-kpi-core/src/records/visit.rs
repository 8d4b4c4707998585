use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Status literal (compared case-insensitively) that marks a visit as billed.
pub const CLAIM_CREATED: &str = "claim created";

/// Exact column headers of the AR analysis export, in export order.
pub const SOURCE_COLUMNS: [&str; 10] = [
    "Visit Date",
    "Visit Status",
    "Visit ID",
    "Charge",
    "Expected",
    "Primary Payment",
    "Secondary Payment",
    "Tertiary Payment",
    "Patient Payment",
    "Balance",
];

/// One row of the AR analysis export before coercion.
///
/// Every cell is kept as text. Missing columns and blank cells both read as
/// `None`; columns not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVisitRow {
    #[serde(rename = "Visit Date")]
    pub visit_date: Option<String>,
    #[serde(rename = "Visit Status")]
    pub visit_status: Option<String>,
    #[serde(rename = "Visit ID")]
    pub visit_id: Option<String>,
    #[serde(rename = "Charge")]
    pub charge: Option<String>,
    #[serde(rename = "Expected")]
    pub expected: Option<String>,
    #[serde(rename = "Primary Payment")]
    pub primary_payment: Option<String>,
    #[serde(rename = "Secondary Payment")]
    pub secondary_payment: Option<String>,
    #[serde(rename = "Tertiary Payment")]
    pub tertiary_payment: Option<String>,
    #[serde(rename = "Patient Payment")]
    pub patient_payment: Option<String>,
    #[serde(rename = "Balance")]
    pub balance: Option<String>,
}

/// A coerced visit/claim record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Not unique across rows in every export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<String>,
    /// `None` when absent or unparseable; such records only reach the snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_status: Option<String>,
    pub charge: Money,
    pub expected: Money,
    pub primary_payment: Money,
    pub secondary_payment: Money,
    pub tertiary_payment: Money,
    pub patient_payment: Money,
    pub balance: Money,
}

impl VisitRecord {
    /// True when the status reads "claim created" in any letter case.
    pub fn is_billed(&self) -> bool {
        self.visit_status
            .as_deref()
            .is_some_and(|s| s.to_lowercase() == CLAIM_CREATED)
    }

    /// Primary + secondary + tertiary + patient payments.
    pub fn payment_total(&self) -> Money {
        self.primary_payment + self.secondary_payment + self.tertiary_payment + self.patient_payment
    }

    /// Visit ID with surrounding whitespace removed, `None` if blank.
    pub fn visit_key(&self) -> Option<&str> {
        self.visit_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
