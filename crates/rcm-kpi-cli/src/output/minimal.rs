use rcm_kpi_core::render::RenderedTable;

/// Print just the headline figure of each row.
///
/// Heuristic: for `Type`/`Value` tables look for well-known row names in
/// order of priority; for period tables print the first priority column
/// present, one line per period.
pub fn print_minimal(tables: &[RenderedTable]) {
    for line in minimal_lines(tables) {
        println!("{}", line);
    }
}

// Priority list of headline fields
const PRIORITY_KEYS: [&str; 4] = [
    "Days in AR (DAR)",
    "Days in AR",
    "Gross Collection Rate (%)",
    "Charges",
];

fn minimal_lines(tables: &[RenderedTable]) -> Vec<String> {
    let mut lines = Vec::new();
    for t in tables {
        let is_key_value = t.columns.len() == 2 && t.columns[0] == "Type";
        if is_key_value {
            let hit = PRIORITY_KEYS.iter().find_map(|key| {
                t.rows
                    .iter()
                    .find(|r| r.first().is_some_and(|k| k == key))
                    .and_then(|r| r.get(1))
            });
            if let Some(v) = hit {
                lines.push(v.clone());
            }
            continue;
        }

        let Some(col) = PRIORITY_KEYS
            .iter()
            .find_map(|key| t.columns.iter().position(|c| c == key))
        else {
            continue;
        };
        for row in &t.rows {
            if let (Some(label), Some(v)) = (row.first(), row.get(col)) {
                lines.push(format!("{}: {}", label, v));
            }
        }
    }
    lines
}
