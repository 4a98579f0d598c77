use rusqlite::{Statement, ToSql};
use rusqlite::types::Value as SqliteValue;

use crate::error::{Result, SqlSessionError};
use crate::results::{ColumnMeta, ResultSet};
use crate::types::Value;

pub(crate) fn statement_error(err: rusqlite::Error) -> SqlSessionError {
    SqlSessionError::Statement(err.to_string())
}

/// Extract a [`Value`] from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlSessionError::Statement` if the engine fails to produce the value.
pub fn sqlite_extract_value_sync(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    let value: SqliteValue = row.get(idx).map_err(statement_error)?;
    Ok(match value {
        SqliteValue::Null => Value::Null,
        SqliteValue::Integer(i) => Value::Int(i),
        SqliteValue::Real(f) => Value::Float(f),
        SqliteValue::Text(s) => Value::Text(s),
        SqliteValue::Blob(b) => Value::Blob(b),
    })
}

/// True if `sql` holds nothing but whitespace, comments, and semicolons.
pub(crate) fn is_blank_statement(sql: &str) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.find('\n').map_or("", |i| &after[i + 1..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            // an unterminated block comment runs to the end of input
            rest = after.find("*/").map_or("", |i| &after[i + 2..]);
        } else {
            return rest.is_empty();
        }
    }
}

/// Run a prepared statement to completion.
///
/// Statements with result columns are stepped through and every row collected along with
/// the declared column types. Statements without result columns are executed and report
/// the number of rows they changed, which is 0 for anything that is not DML.
///
/// # Errors
/// Returns `SqlSessionError::Statement` if binding or stepping the statement fails.
pub fn build_result_set(
    conn: &rusqlite::Connection,
    stmt: &mut Statement<'_>,
    params: &[Value],
) -> Result<ResultSet> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();

    if stmt.column_count() == 0 {
        // sqlite3_changes() keeps the last DML count across DDL; only trust it when this
        // statement moved the connection's running total.
        let before = conn.total_changes();
        let changed = stmt.execute(&param_refs[..]).map_err(statement_error)?;
        let affected = if conn.total_changes() == before { 0 } else { changed };
        return Ok(ResultSet::affected(affected));
    }

    let columns: Vec<ColumnMeta> = stmt
        .columns()
        .iter()
        .map(|c| ColumnMeta::new(c.name(), c.decl_type().map(str::to_owned)))
        .collect();
    let col_count = columns.len();

    let mut result_set = ResultSet::with_columns(columns, 10);
    let mut rows_iter = stmt.query(&param_refs[..]).map_err(statement_error)?;
    while let Some(row) = rows_iter.next().map_err(statement_error)? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result_set.add_row_values(row_values)?;
    }

    Ok(result_set)
}

#[cfg(test)]
mod tests {
    use super::is_blank_statement;

    #[test]
    fn blank_statements() {
        assert!(is_blank_statement(""));
        assert!(is_blank_statement("  \n\t"));
        assert!(is_blank_statement("-- nothing here"));
        assert!(is_blank_statement("/* a */ ; -- b\n ;"));
        assert!(is_blank_statement("/* never closed"));
        assert!(!is_blank_statement("select 1"));
        assert!(!is_blank_statement("-- lead\nselect 1"));
        assert!(!is_blank_statement("/* a */ select '--'"));
    }
}
