use serde_json::{Map, Number, Value as JsonValue};

use crate::types::{TIMESTAMP_WRITE_FORMAT, Value};

use super::Table;

impl Table {
    /// Export as a JSON array with one object per row, keys in column order.
    ///
    /// Timestamps are written as text, blobs as arrays of bytes, and non-finite floats as null.
    #[must_use]
    pub fn to_json_records(&self) -> JsonValue {
        let records = (0..self.num_rows)
            .map(|row| {
                let mut record = Map::with_capacity(self.columns.len());
                for column in &self.columns {
                    record.insert(column.name.clone(), to_json(column.get(row)));
                }
                JsonValue::Object(record)
            })
            .collect();
        JsonValue::Array(records)
    }

    /// Export as newline-delimited JSON: one object per row, each line ending in `\n`.
    #[must_use]
    pub fn to_ndjson(&self) -> String {
        let JsonValue::Array(records) = self.to_json_records() else {
            return String::new();
        };
        records.iter().map(|r| format!("{r}\n")).collect()
    }
}

fn to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int(i) => JsonValue::from(i),
        Value::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Text(s) => JsonValue::String(s),
        Value::Bool(b) => JsonValue::Bool(b),
        Value::Timestamp(ts) => JsonValue::String(ts.format(TIMESTAMP_WRITE_FORMAT).to_string()),
        Value::Blob(bytes) => JsonValue::from(bytes),
    }
}
