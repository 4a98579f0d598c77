use chrono::NaiveDateTime;
use serde::Serialize;

use crate::types::{ColumnType, Value};

/// Typed storage for one column. `None` is a NULL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values")]
pub enum ColumnValues {
    /// A column with no type information; holds only its length.
    Null(usize),
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Utf8(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Binary(Vec<Option<Vec<u8>>>),
}

impl ColumnValues {
    /// Empty storage for a column type, with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(data_type: ColumnType, capacity: usize) -> Self {
        match data_type {
            ColumnType::Null => Self::Null(0),
            ColumnType::Int64 => Self::Int64(Vec::with_capacity(capacity)),
            ColumnType::Float64 => Self::Float64(Vec::with_capacity(capacity)),
            ColumnType::Utf8 => Self::Utf8(Vec::with_capacity(capacity)),
            ColumnType::Boolean => Self::Boolean(Vec::with_capacity(capacity)),
            ColumnType::Timestamp => Self::Timestamp(Vec::with_capacity(capacity)),
            ColumnType::Binary => Self::Binary(Vec::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub fn data_type(&self) -> ColumnType {
        match self {
            Self::Null(_) => ColumnType::Null,
            Self::Int64(_) => ColumnType::Int64,
            Self::Float64(_) => ColumnType::Float64,
            Self::Utf8(_) => ColumnType::Utf8,
            Self::Boolean(_) => ColumnType::Boolean,
            Self::Timestamp(_) => ColumnType::Timestamp,
            Self::Binary(_) => ColumnType::Binary,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Null(len) => *len,
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Utf8(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Timestamp(v) => v.len(),
            Self::Binary(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index` as a [`Value`]; out of range reads as NULL.
    #[must_use]
    pub fn get(&self, index: usize) -> Value {
        match self {
            Self::Null(_) => None,
            Self::Int64(v) => v.get(index).copied().flatten().map(Value::Int),
            Self::Float64(v) => v.get(index).copied().flatten().map(Value::Float),
            Self::Utf8(v) => v.get(index).cloned().flatten().map(Value::Text),
            Self::Boolean(v) => v.get(index).copied().flatten().map(Value::Bool),
            Self::Timestamp(v) => v.get(index).copied().flatten().map(Value::Timestamp),
            Self::Binary(v) => v.get(index).cloned().flatten().map(Value::Blob),
        }
        .unwrap_or(Value::Null)
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn data_type(&self) -> ColumnType {
        self.values.data_type()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Value {
        self.values.get(index)
    }
}
