use arrow_schema::{DataType, TimeUnit};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text layouts accepted when reading a timestamp stored as text.
pub(crate) const TIMESTAMP_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Layout used when a timestamp is written back to the engine as text.
pub(crate) const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single value produced by the engine or bound as a statement parameter.
///
/// ```rust
/// use sql_session::Value;
///
/// let params = vec![Value::Int(1), Value::Text("alice".into()), Value::Bool(true)];
/// assert_eq!(params[0].as_int(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// Binary data
    Blob(Vec<u8>),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans, plus the integers 0 and 1 the engine stores them as.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps, plus text in one of the layouts the engine writes them in.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(value) => Some(*value),
            Value::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let Value::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Blob(_) => "blob",
        }
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Logical type of a materialized column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// No non-null value and no declared type to go by.
    Null,
    Int64,
    Float64,
    Utf8,
    Boolean,
    Timestamp,
    Binary,
}

impl ColumnType {
    /// Map an engine declared column type onto a column type.
    ///
    /// Follows SQLite's affinity rules, checking the boolean and temporal names first since
    /// those have no affinity of their own. Returns `None` when the declared type does not pin
    /// down a representation (e.g. `NUMERIC`), leaving the caller to infer from the values.
    #[must_use]
    pub fn from_declared(decl_type: &str) -> Option<Self> {
        let upper = decl_type.to_ascii_uppercase();
        if upper.contains("BOOL") {
            Some(Self::Boolean)
        } else if upper.contains("DATE") || upper.contains("TIME") {
            Some(Self::Timestamp)
        } else if upper.contains("INT") {
            Some(Self::Int64)
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            Some(Self::Utf8)
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Some(Self::Float64)
        } else if upper.contains("BLOB") {
            Some(Self::Binary)
        } else {
            None
        }
    }

    #[must_use]
    pub fn to_arrow(self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Int64 => DataType::Int64,
            Self::Float64 => DataType::Float64,
            Self::Utf8 => DataType::Utf8,
            Self::Boolean => DataType::Boolean,
            Self::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
            Self::Binary => DataType::Binary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_follow_affinity() {
        assert_eq!(ColumnType::from_declared("int"), Some(ColumnType::Int64));
        assert_eq!(ColumnType::from_declared("BIGINT"), Some(ColumnType::Int64));
        assert_eq!(ColumnType::from_declared("varchar(20)"), Some(ColumnType::Utf8));
        assert_eq!(ColumnType::from_declared("DOUBLE PRECISION"), Some(ColumnType::Float64));
        assert_eq!(ColumnType::from_declared("boolean"), Some(ColumnType::Boolean));
        assert_eq!(ColumnType::from_declared("DATETIME"), Some(ColumnType::Timestamp));
        assert_eq!(ColumnType::from_declared("blob"), Some(ColumnType::Binary));
        assert_eq!(ColumnType::from_declared("NUMERIC"), None);
    }

    #[test]
    fn timestamps_parse_from_text() {
        let v = Value::Text("2024-03-01 12:30:00".into());
        let ts = v.as_timestamp().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 12:30:00");

        let v = Value::Text("2024-03-01".into());
        assert_eq!(v.as_timestamp().unwrap().to_string(), "2024-03-01 00:00:00");

        assert!(Value::Text("not a date".into()).as_timestamp().is_none());
    }

    #[test]
    fn bool_accepts_zero_and_one_only() {
        assert_eq!(Value::Int(1).as_bool(), Some(true));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Int(2).as_bool(), None);
    }
}
