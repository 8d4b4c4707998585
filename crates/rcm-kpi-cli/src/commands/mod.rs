pub mod periods;
pub mod report;
