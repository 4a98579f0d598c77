//! Connections and statement execution over an embedded SQL engine.
//!
//! Two ways in:
//!
//! - the default connection, shared by the whole process and created on first use:
//!
//! ```rust,no_run
//! # async fn demo() -> sql_session::Result<()> {
//! sql_session::execute("create table t (a int)").await?;
//! let table = sql_session::execute("select * from t").await?.to_table()?;
//! sql_session::execute("drop table t").await?;
//! # let _ = table;
//! # Ok(())
//! # }
//! ```
//!
//! - explicit connections, each with its own engine handle, released at scope exit:
//!
//! ```rust,no_run
//! # async fn demo() -> sql_session::Result<()> {
//! let conn = sql_session::connect().await?;
//! let batch = conn
//!     .scoped(|db| async move { db.sql("select 1 as a").await?.to_arrow() })
//!     .await?;
//! assert_eq!(batch.num_rows(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! `execute` hands back an [`ExecutionResult`] holding the engine's output; rows are only
//! converted into a [`Table`] (and from there to Arrow, JSON, or text) when asked for.

pub mod config;
pub mod connection;
pub mod default;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod result;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod table;
pub mod types;

pub use config::{ConnectOptions, ConnectOptionsBuilder};
pub use connection::{Connection, ConnectionScope};
pub use default::DefaultRegistry;
pub use engine::{Engine, EngineHandle};
pub use error::{Result, SqlSessionError};
pub use result::ExecutionResult;
pub use results::{ColumnMeta, ResultSet, Row};
pub use table::{Column, ColumnValues, Table, materialize};
pub use types::{ColumnType, Value};

#[cfg(feature = "sqlite")]
pub use connection::{connect, connect_with};
#[cfg(feature = "sqlite")]
pub use default::{default_connection, execute, execute_params, shutdown_default, sql};
