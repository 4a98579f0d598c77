use crate::error::{Result, SqlSessionError};
use crate::results::ResultSet;
use crate::types::{ColumnType, Value};

use super::{Column, ColumnValues, Table};

/// Convert an engine result set into a [`Table`].
///
/// Column names and order are kept exactly. Each column's type comes from the type the
/// engine declared for it when that maps onto a column type, and is otherwise inferred from
/// the values. A value that does not fit its column's type is an error rather than being
/// coerced. A result set with no rows becomes a table with the same columns and no rows.
///
/// # Errors
/// Returns `SqlSessionError::Materialization` naming the column and row of the first value
/// that does not fit.
pub fn materialize(result_set: &ResultSet) -> Result<Table> {
    let row_count = result_set.row_count();
    let mut columns = Vec::with_capacity(result_set.column_count());

    for (idx, meta) in result_set.columns().iter().enumerate() {
        let data_type = match meta.decl_type.as_deref().and_then(ColumnType::from_declared) {
            Some(declared) => declared,
            None => infer_type(&meta.name, result_set.column_values(idx))?,
        };

        let mut values = ColumnValues::with_capacity(data_type, row_count);
        for (row, value) in result_set.column_values(idx).enumerate() {
            if !push_value(&mut values, value) {
                return Err(SqlSessionError::Materialization(format!(
                    "column {} row {row}: {} value does not fit column type {data_type:?}",
                    meta.name,
                    value.kind()
                )));
            }
        }
        columns.push(Column::new(meta.name.clone(), values));
    }

    if columns.is_empty() {
        return Ok(Table::empty());
    }
    Table::try_new(columns)
}

fn value_type(value: &Value) -> Option<ColumnType> {
    match value {
        Value::Null => None,
        Value::Int(_) => Some(ColumnType::Int64),
        Value::Float(_) => Some(ColumnType::Float64),
        Value::Text(_) => Some(ColumnType::Utf8),
        Value::Bool(_) => Some(ColumnType::Boolean),
        Value::Timestamp(_) => Some(ColumnType::Timestamp),
        Value::Blob(_) => Some(ColumnType::Binary),
    }
}

/// Narrowest column type holding every non-null value. Integers mixed with floats widen
/// to floats; any other mix is an error.
fn infer_type<'a>(name: &str, values: impl Iterator<Item = &'a Value>) -> Result<ColumnType> {
    let mut inferred: Option<ColumnType> = None;
    for (row, value) in values.enumerate() {
        let Some(kind) = value_type(value) else {
            continue;
        };
        inferred = Some(match inferred {
            None => kind,
            Some(current) if current == kind => current,
            Some(ColumnType::Int64 | ColumnType::Float64)
                if matches!(kind, ColumnType::Int64 | ColumnType::Float64) =>
            {
                ColumnType::Float64
            }
            Some(current) => {
                return Err(SqlSessionError::Materialization(format!(
                    "column {name} row {row}: {} value in a column of {current:?} values",
                    value.kind()
                )));
            }
        });
    }
    Ok(inferred.unwrap_or(ColumnType::Null))
}

/// Append `value` if it fits; false if it does not.
fn push_value(values: &mut ColumnValues, value: &Value) -> bool {
    let is_null = value.is_null();
    match values {
        ColumnValues::Null(len) => {
            *len += 1;
            is_null
        }
        ColumnValues::Int64(v) => push_opt(v, is_null, value.as_int()),
        ColumnValues::Float64(v) => push_opt(v, is_null, exact_float(value)),
        ColumnValues::Utf8(v) => push_opt(v, is_null, value.as_text().map(str::to_owned)),
        ColumnValues::Boolean(v) => push_opt(v, is_null, value.as_bool()),
        ColumnValues::Timestamp(v) => push_opt(v, is_null, value.as_timestamp()),
        ColumnValues::Binary(v) => push_opt(v, is_null, value.as_blob().map(<[u8]>::to_vec)),
    }
}

/// Float for `value`, refusing integers that an `f64` cannot hold exactly.
fn exact_float(value: &Value) -> Option<f64> {
    match value {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        Value::Int(i) => {
            let f = *i as f64;
            (f as i128 == i128::from(*i)).then_some(f)
        }
        other => other.as_float(),
    }
}

fn push_opt<T>(column: &mut Vec<Option<T>>, is_null: bool, converted: Option<T>) -> bool {
    if is_null {
        column.push(None);
        return true;
    }
    match converted {
        Some(v) => {
            column.push(Some(v));
            true
        }
        None => false,
    }
}
