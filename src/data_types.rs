// src/data_types.rs
use serde_json::Value;

/// One record returned by an enrichment service: column name mapped to a
/// scalar cell value. The map keeps document order so the column order the
/// service chose survives rendering.
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn empty() -> Self {
        TableData {
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Shapes a record collection for display. Headers come from the first
    /// record; each row renders its own record's values in that record's key
    /// order. Records with a different key set are not reconciled.
    pub fn from_records(records: &[Record]) -> Self {
        let Some(first) = records.first() else {
            return TableData::empty();
        };

        let headers = first.keys().cloned().collect();
        let rows = records
            .iter()
            .map(|record| record.values().map(display_value).collect())
            .collect();

        TableData { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Raw display form of a cell: strings unquoted, everything else (numbers,
/// booleans, null, nested values) as its JSON representation.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
