pub mod error;
pub mod kpi;
pub mod periods;
pub mod records;
pub mod types;

#[cfg(feature = "render")]
pub mod render;

pub use error::KpiError;
pub use types::*;

/// Standard result type for all KPI operations
pub type KpiResult<T> = Result<T, KpiError>;
