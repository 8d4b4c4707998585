use rcm_kpi_core::render::RenderedTable;
use std::io::{self, Write};

/// Write tables as CSV to stdout. Multiple tables are separated by a blank
/// line.
pub fn print_csv(tables: &[RenderedTable]) {
    let stdout = io::stdout();
    let mut lock = stdout.lock();

    for (i, t) in tables.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(lock);
        }
        if let Err(e) = write_table(&mut lock, t) {
            eprintln!("CSV write error: {}", e);
            return;
        }
    }
}

/// Write one table, header first.
pub fn write_table<W: Write>(writer: W, table: &RenderedTable) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
