//! Human-readable diffs between two serialized entity states

use serde_json::Value;

const MAX_STRING_LEN: usize = 50;

/// Describe the top-level field changes between two JSON values
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut changes: Vec<String> = old
                .iter()
                .filter_map(|(key, old_val)| match new.get(key) {
                    Some(new_val) if new_val == old_val => None,
                    Some(new_val) => Some(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(old_val),
                        format_value(new_val)
                    )),
                    None => Some(format!("{}: {} -> (removed)", key, format_value(old_val))),
                })
                .collect();

            changes.extend(
                new.iter()
                    .filter(|(key, _)| !old.contains_key(*key))
                    .map(|(key, val)| format!("{}: (added) -> {}", key, format_value(val))),
            );
            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Cash", "balance": 10});
        assert_eq!(generate_diff(&value, &value), None);
    }

    #[test]
    fn test_changed_removed_and_added_fields() {
        let before = json!({"amount": 500, "note": "lunch"});
        let after = json!({"amount": 300, "location": "Tashkent"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("amount: 500 -> 300"));
        assert!(diff.contains("note: \"lunch\" -> (removed)"));
        assert!(diff.contains("location: (added) -> \"Tashkent\""));
    }

    #[test]
    fn test_long_strings_are_truncated() {
        let long = "x".repeat(80);
        let diff = generate_diff(&json!({"note": long}), &json!({"note": "short"})).unwrap();
        assert!(diff.contains("...\" -> \"short\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(
            generate_diff(&json!(1), &json!(2)).as_deref(),
            Some("1 -> 2")
        );
    }
}
