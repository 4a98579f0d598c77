//! Engine-native query output, before it is materialized into a [`crate::Table`].

mod result_set;
mod row;

pub use result_set::{ColumnMeta, ResultSet};
pub use row::Row;
