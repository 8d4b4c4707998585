use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages on a 0–100 scale (112.5 = 112.50%). Unlike a rate, never a fraction.
pub type Percent = Decimal;

/// Whole-day counts used as AR-aging denominators
pub type Days = u32;

/// Result of a KPI computation for one period.
///
/// `NotApplicable` marks a period with no matching records. It is distinct from
/// a computed zero: a period with records but zero charges still reports
/// `Computed` metrics whose percentages are `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "metrics", rename_all = "snake_case")]
pub enum PeriodResult<T> {
    Computed(T),
    NotApplicable,
}

impl<T> PeriodResult<T> {
    pub fn computed(&self) -> Option<&T> {
        match self {
            PeriodResult::Computed(v) => Some(v),
            PeriodResult::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, PeriodResult::NotApplicable)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
