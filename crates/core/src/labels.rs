//! Human-readable labels derived from field names and values.

use crate::types::{Date, Timestamp};

/// Derive a column label from a field name.
///
/// Underscores become spaces and every word is capitalised, the rest of each
/// word lowercased: `default_start_number` -> `Default Start Number`.
pub fn title_case(field_name: &str) -> String {
    field_name
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a boolean cell.
pub fn yes_no(value: bool) -> String {
    if value { "Ja" } else { "Nein" }.to_string()
}

/// Render an optional text cell; `None` renders empty.
pub fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Render an optional number cell.
pub fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render a date cell as `YYYY-MM-DD`.
pub fn date(value: Option<Date>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Render a timestamp cell as `YYYY-MM-DD HH:MM` (UTC).
pub fn datetime(value: Option<Timestamp>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
