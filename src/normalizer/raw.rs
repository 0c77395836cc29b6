use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use super::nulls::is_null_like;
use crate::error::LoadError;
use crate::models::{ProductId, COLUMNS, PRODUCT_ID};

/// One harvested object as read back from the JSON file. Any column may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Position in the input array, for log messages.
    pub index: usize,
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(index: usize, fields: Map<String, Value>) -> Self {
        Self { index, fields }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// The column as text, `None` when absent, `null` or null-like.
    pub fn text(&self, column: &str) -> Option<String> {
        let text = match self.fields.get(column)? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        };

        if is_null_like(&text) {
            None
        } else {
            Some(text)
        }
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.text(PRODUCT_ID).map(|id| ProductId(id.trim().to_string()))
    }
}

pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_records(&content)
}

/// Parse a JSON array of objects. Non-object elements are logged and dropped.
pub fn parse_records(json: &str) -> Result<Vec<RawRecord>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::Shape(format!(
                "expected a top-level array, found {}",
                json_kind(&other)
            )))
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(fields) => Some(RawRecord::new(index, fields)),
            other => {
                warn!("Skipping element {}: expected an object, found {}", index, json_kind(&other));
                None
            }
        })
        .collect();

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Destination columns that no record carries at all.
pub fn missing_columns(records: &[RawRecord]) -> Vec<String> {
    COLUMNS
        .iter()
        .filter(|column| !records.iter().any(|r| r.has_column(column)))
        .cloned()
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DedupeStats {
    pub duplicates: usize,
    pub missing_id: usize,
}

/// Keep the first record per product id; records without an id are dropped.
pub fn dedupe(records: Vec<RawRecord>) -> (Vec<RawRecord>, DedupeStats) {
    let mut seen = HashSet::new();
    let mut stats = DedupeStats::default();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        let Some(id) = record.product_id() else {
            warn!("Skipping row at index {}: no product id", record.index);
            stats.missing_id += 1;
            continue;
        };

        if seen.insert(id) {
            kept.push(record);
        } else {
            stats.duplicates += 1;
        }
    }

    (kept, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(index: usize, value: Value) -> RawRecord {
        match value {
            Value::Object(fields) => RawRecord::new(index, fields),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn text_treats_null_tokens_as_missing() {
        let raw = record(0, json!({"a": "n/a", "b": null, "c": 4.5, "d": " Fine ", "e": 3}));
        assert_eq!(raw.text("a"), None);
        assert_eq!(raw.text("b"), None);
        assert_eq!(raw.text("c").as_deref(), Some("4.5"));
        assert_eq!(raw.text("d").as_deref(), Some(" Fine "));
        assert_eq!(raw.text("e").as_deref(), Some("3"));
        assert_eq!(raw.text("missing"), None);
    }

    #[test]
    fn parse_records_requires_array() {
        assert!(matches!(parse_records(r#"{"Product_ID": "X"}"#), Err(LoadError::Shape(_))));
        assert!(matches!(parse_records("[{"), Err(LoadError::Json(_))));

        let records = parse_records(r#"[{"Product_ID": "A"}, 7, {"Product_ID": "B"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].index, 2);
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let first = record(0, json!({"Product_ID": "A", "product": "first"}));
        let records = vec![
            first.clone(),
            record(1, json!({"Product_ID": "B"})),
            record(2, json!({"Product_ID": "A", "product": "second"})),
            record(3, json!({"Product_ID": "None"})),
        ];

        let (kept, stats) = dedupe(records);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], first);
        assert_eq!(stats, DedupeStats { duplicates: 1, missing_id: 1 });
    }

    #[test]
    fn reports_columns_absent_everywhere() {
        let records = vec![record(0, json!({"Product_ID": "A", "Customer_1_ID": "R1"}))];
        let missing = missing_columns(&records);
        assert!(!missing.contains(&"Product_ID".to_string()));
        assert!(!missing.contains(&"Customer_1_ID".to_string()));
        assert!(missing.contains(&"Customer_5_Date".to_string()));
        assert_eq!(missing.len(), 44);
    }
}
