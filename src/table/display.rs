use std::fmt;

use crate::types::{TIMESTAMP_WRITE_FORMAT, Value};

use super::Table;

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Timestamp(ts) => ts.format(TIMESTAMP_WRITE_FORMAT).to_string(),
        Value::Blob(bytes) => {
            let mut out = String::with_capacity(2 + bytes.len() * 2);
            out.push_str("\\x");
            for b in bytes {
                out.push_str(&format!("{b:02x}"));
            }
            out
        }
    }
}

fn border(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    for w in widths {
        write!(f, "+{}", "-".repeat(w + 2))?;
    }
    writeln!(f, "+")
}

fn line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    for (text, &w) in cells.iter().zip(widths) {
        write!(f, "| {text:<w$} ")?;
    }
    writeln!(f, "|")
}

/// A table rendered with at most `max_rows` rows.
struct Limited<'a> {
    table: &'a Table,
    max_rows: Option<usize>,
}

impl Table {
    /// Render as a text grid showing at most `max_rows` rows.
    ///
    /// When rows are cut, a footer line gives how many were shown out of the total.
    #[must_use]
    pub fn to_text(&self, max_rows: Option<usize>) -> String {
        Limited {
            table: self,
            max_rows,
        }
        .to_string()
    }
}

/// Boxed text grid: a header row of column names, then one line per row.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = Limited {
            table: self,
            max_rows: None,
        };
        fmt::Display::fmt(&full, f)
    }
}

impl fmt::Display for Limited<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table;
        if table.columns.is_empty() {
            return writeln!(f, "(empty)");
        }
        let shown = self.max_rows.map_or(table.num_rows, |m| m.min(table.num_rows));

        let header: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
        let body: Vec<Vec<String>> = (0..shown)
            .map(|row| table.columns.iter().map(|c| cell(&c.get(row))).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &body {
            for (w, text) in widths.iter_mut().zip(row) {
                *w = (*w).max(text.chars().count());
            }
        }

        border(f, &widths)?;
        line(f, &header, &widths)?;
        border(f, &widths)?;
        for row in &body {
            line(f, row, &widths)?;
        }
        border(f, &widths)?;
        if shown < table.num_rows {
            writeln!(f, "({shown} of {} rows shown)", table.num_rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::table::{Column, ColumnValues, Table};

    #[test]
    fn renders_grid() {
        let table = Table::try_new(vec![
            Column::new("a", ColumnValues::Int64(vec![Some(1), None])),
            Column::new("name", ColumnValues::Utf8(vec![Some("x".into()), Some("yy".into())])),
        ])
        .unwrap();
        let expected = "\
+------+------+
| a    | name |
+------+------+
| 1    | x    |
| NULL | yy   |
+------+------+
";
        assert_eq!(table.to_string(), expected);
        assert_eq!(table.to_text(None), expected);
        assert_eq!(table.to_text(Some(5)), expected);
    }

    #[test]
    fn cuts_rows_past_limit() {
        let table = Table::try_new(vec![Column::new(
            "n",
            ColumnValues::Int64(vec![Some(1), Some(22), Some(333)]),
        )])
        .unwrap();
        let expected = "\
+----+
| n  |
+----+
| 1  |
| 22 |
+----+
(2 of 3 rows shown)
";
        assert_eq!(table.to_text(Some(2)), expected);
    }
}
