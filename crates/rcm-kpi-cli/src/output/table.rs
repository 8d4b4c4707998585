use rcm_kpi_core::render::RenderedTable;
use tabled::{builder::Builder, Table};

use super::CommandOutput;

/// Print every table with its title, then any envelope warnings.
pub fn print_tables(output: &CommandOutput) {
    if output.tables.is_empty() {
        println!("(empty)");
    }

    for (i, t) in output.tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}: {}", t.name, t.title);
        println!("{}", build_table(t));
    }

    let warnings = output.warnings();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in warnings {
            println!("  - {}", w);
        }
    }

    // Print methodology
    if let Some(meth) = output.value.get("methodology").and_then(|m| m.as_str()) {
        println!("\nMethodology: {}", meth);
    }
}

fn build_table(t: &RenderedTable) -> Table {
    let mut builder = Builder::default();
    builder.push_record(t.columns.iter().map(String::as_str));
    for row in &t.rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    Table::from(builder)
}
