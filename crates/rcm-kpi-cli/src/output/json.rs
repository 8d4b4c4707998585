use serde_json::Value;

use super::CommandOutput;

/// Pretty-print the result envelope to stdout, with the rendered legacy
/// tables attached under `tables`.
pub fn print_json(output: &CommandOutput) {
    let mut value = output.value.clone();
    if let Value::Object(ref mut map) = value {
        if !output.tables.is_empty() {
            map.insert(
                "tables".to_string(),
                serde_json::to_value(&output.tables).unwrap_or_default(),
            );
        }
    }
    match serde_json::to_string_pretty(&value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
