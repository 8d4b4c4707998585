use std::io::{self, Read};

use super::file::{read_visit_rows, VisitExport};

/// Attempt to read a visit export CSV from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<VisitExport>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    let export = read_visit_rows(buffer.as_bytes(), "<stdin>")?;
    Ok(Some(export))
}
