pub mod csv_out;
pub mod export;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rcm_kpi_core::render::RenderedTable;
use serde_json::Value;

/// What a command hands to the formatters: the typed result as JSON plus its
/// display tables.
pub struct CommandOutput {
    pub value: Value,
    pub tables: Vec<RenderedTable>,
}

impl CommandOutput {
    /// Warnings carried in the computation envelope, if any.
    pub fn warnings(&self) -> Vec<&str> {
        self.value
            .get("warnings")
            .and_then(Value::as_array)
            .map(|ws| ws.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, output: &CommandOutput) {
    match format {
        OutputFormat::Json => json::print_json(output),
        OutputFormat::Table => table::print_tables(output),
        OutputFormat::Csv => csv_out::print_csv(&output.tables),
        OutputFormat::Minimal => minimal::print_minimal(&output.tables),
    }
}
