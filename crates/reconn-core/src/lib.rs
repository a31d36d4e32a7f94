pub mod config;
pub mod logging;

pub mod connection;
pub mod control;
pub mod dial;
pub mod retry;

pub use connection::{Connection, QueryOutput, QueryResult, Row, Transport, Value};
pub use retry::{AutoConn, AutoConnect, DbError};
