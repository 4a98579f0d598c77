use arrow_csv::WriterBuilder;

use crate::error::{Result, SqlSessionError};
use crate::types::TIMESTAMP_WRITE_FORMAT;

use super::Table;

impl Table {
    /// Export as CSV text with a header line of column names.
    ///
    /// Nulls are written as empty fields; timestamps use the same layout as the text grid.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if the Arrow CSV writer rejects a column.
    pub fn to_csv(&self) -> Result<String> {
        let batch = self.to_record_batch()?;
        let mut bytes = Vec::new();
        {
            let mut writer = WriterBuilder::new()
                .with_header(true)
                .with_timestamp_format(TIMESTAMP_WRITE_FORMAT.to_string())
                .build(&mut bytes);
            writer.write(&batch)?;
        }
        String::from_utf8(bytes)
            .map_err(|e| SqlSessionError::Materialization(format!("CSV output is not UTF-8: {e}")))
    }
}
