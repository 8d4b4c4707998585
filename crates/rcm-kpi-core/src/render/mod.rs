pub mod format;
pub mod tables;

pub use format::{format_currency, format_percent, format_rate, NOT_APPLICABLE};
pub use tables::{
    render_quarterly, render_report, render_snapshot, render_yearly, RenderedTable,
    QUARTERLY_COLUMNS, SNAPSHOT_COLUMNS, YEARLY_COLUMNS,
};
