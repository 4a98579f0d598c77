use rusqlite::types::{ToSqlOutput, Value as SqliteValue};

use crate::types::{TIMESTAMP_WRITE_FORMAT, Value};

/// Convert a single [`Value`] to a rusqlite `Value`.
///
/// `SQLite` has no boolean or timestamp storage class, so booleans bind as 0/1 and
/// timestamps as text in the layout the materializer reads back.
#[must_use]
pub fn value_to_sqlite_value(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Int(i) => SqliteValue::Integer(*i),
        Value::Float(f) => SqliteValue::Real(*f),
        Value::Text(s) => SqliteValue::Text(s.clone()),
        Value::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Timestamp(dt) => SqliteValue::Text(dt.format(TIMESTAMP_WRITE_FORMAT).to_string()),
        Value::Blob(bytes) => SqliteValue::Blob(bytes.clone()),
    }
}

impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(value_to_sqlite_value(self)))
    }
}
