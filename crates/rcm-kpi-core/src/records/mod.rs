pub mod normalize;
pub mod visit;

pub use normalize::{normalize_rows, parse_amount, parse_visit_date, CoercionReport, NormalizedRecords};
pub use visit::{RawVisitRow, VisitRecord, CLAIM_CREATED, SOURCE_COLUMNS};
