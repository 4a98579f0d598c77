use std::sync::Arc;

use arrow_array::{
    ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array, NullArray, RecordBatch,
    RecordBatchOptions, StringArray, TimestampMicrosecondArray,
};
use arrow_schema::{Field, Schema};

use crate::error::Result;

use super::{ColumnValues, Table};

impl Table {
    /// Export to an Arrow `RecordBatch`.
    ///
    /// Every field is nullable. Timestamps become microsecond timestamps without a time zone.
    /// The row count is carried explicitly so a table with no columns keeps it.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if Arrow rejects the batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(&c.name, c.data_type().to_arrow(), true))
            .collect();
        let arrays: Vec<ArrayRef> = self.columns.iter().map(|c| to_array(&c.values)).collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(batch)
    }
}

fn to_array(values: &ColumnValues) -> ArrayRef {
    match values {
        ColumnValues::Null(len) => Arc::new(NullArray::new(*len)),
        ColumnValues::Int64(v) => Arc::new(Int64Array::from(v.clone())),
        ColumnValues::Float64(v) => Arc::new(Float64Array::from(v.clone())),
        ColumnValues::Utf8(v) => Arc::new(StringArray::from(v.clone())),
        ColumnValues::Boolean(v) => Arc::new(BooleanArray::from(v.clone())),
        ColumnValues::Timestamp(v) => Arc::new(TimestampMicrosecondArray::from(
            v.iter()
                .map(|ts| ts.map(|ts| ts.and_utc().timestamp_micros()))
                .collect::<Vec<_>>(),
        )),
        ColumnValues::Binary(v) => Arc::new(BinaryArray::from(
            v.iter().map(Option::as_deref).collect::<Vec<Option<&[u8]>>>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use arrow_array::Array;
    use arrow_schema::DataType;

    use super::*;
    use crate::table::Column;

    #[test]
    fn exports_names_types_and_values() {
        let table = Table::try_new(vec![
            Column::new("a", ColumnValues::Int64(vec![Some(1), None])),
            Column::new("b", ColumnValues::Utf8(vec![Some("x".into()), Some("y".into())])),
            Column::new("c", ColumnValues::Binary(vec![None, Some(vec![1, 2])])),
        ])
        .unwrap();
        let batch = table.to_record_batch().unwrap();

        assert_eq!(batch.num_rows(), 2);
        let schema = batch.schema();
        assert_eq!(schema.field(0).name(), "a");
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(2).data_type(), &DataType::Binary);

        let a = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(a.value(0), 1);
        assert!(a.is_null(1));
        let c = batch.column(2).as_any().downcast_ref::<BinaryArray>().unwrap();
        assert_eq!(c.value(1), &[1, 2]);
    }

    #[test]
    fn empty_table_keeps_row_count() {
        let batch = Table::empty().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 0);
    }
}
