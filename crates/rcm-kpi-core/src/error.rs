use thiserror::Error;

#[derive(Debug, Error)]
pub enum KpiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Date error: {0}")]
    DateError(String),
}
