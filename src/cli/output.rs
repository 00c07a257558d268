use serde::Serialize;

use crate::model::{FieldValue, Record};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FieldSummaryJson {
    pub name: String,
    pub kind: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct FieldJson {
    pub field: String,
    pub kind: String,
    pub items: serde_json::Value,
}

pub fn field_summaries(record: &Record) -> Vec<FieldSummaryJson> {
    record
        .fields
        .iter()
        .map(|(name, value)| FieldSummaryJson {
            name: name.clone(),
            kind: value.kind().to_string(),
            count: value.len(),
        })
        .collect()
}

pub fn field_json(name: &str, value: &FieldValue) -> FieldJson {
    FieldJson {
        field: name.to_string(),
        kind: value.kind().to_string(),
        items: value.items_json(),
    }
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// `name  kind  count`, columns padded to the longest name
pub fn format_fields(record: &Record) -> Vec<String> {
    let width = record.fields.keys().map(|n| n.len()).max().unwrap_or(0);
    record
        .fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{:<width$}  {:<6}  {}",
                name,
                value.kind().as_str(),
                value.len(),
                width = width
            )
        })
        .collect()
}

/// One line per item, index first, `*` on the primary
pub fn format_items(value: &FieldValue) -> Vec<String> {
    value
        .display_items()
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let mark = if i == 0 { "*" } else { " " };
            format!("{}{} {}", mark, i, text)
        })
        .collect()
}
