// SQLite engine - the embedded engine shipped with the crate
//
// - config: opening databases and applying connection options
// - connection: the engine handle a client connection owns
// - params: binding client values as SQLite parameters
// - query: running statements and collecting result sets

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::SqliteEngine;
pub use connection::SqliteHandle;
pub use params::value_to_sqlite_value;
pub use query::build_result_set;
