//! Convenient imports for common functionality.

pub use crate::config::{ConnectOptions, ConnectOptionsBuilder};
pub use crate::connection::{Connection, ConnectionScope};
pub use crate::error::{Result, SqlSessionError};
pub use crate::result::ExecutionResult;
pub use crate::results::{ResultSet, Row};
pub use crate::table::{Column, ColumnValues, Table};
pub use crate::types::{ColumnType, Value};

#[cfg(feature = "sqlite")]
pub use crate::connection::{connect, connect_with};
#[cfg(feature = "sqlite")]
pub use crate::default::{default_connection, shutdown_default};
