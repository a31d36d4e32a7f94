//! Contract of the wrapped database client.
//!
//! Wire protocol, authentication and result-set parsing live in the client
//! library; this crate only needs the capabilities below to drive reconnects.

use crate::retry::DbError;

/// A single column value, as sent in parameters or read back in rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

pub type Row = Vec<Value>;

/// Metadata returned with every query or statement execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub affected_rows: u64,
    pub insert_id: u64,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub result: QueryResult,
}

/// The link to the server: enough to establish and re-establish it.
pub trait Transport {
    /// Whether a transport handle is present. Not a round-trip liveness probe.
    fn is_connected(&self) -> bool;

    /// Open the transport. Safe to call again after a failure.
    fn connect(&mut self) -> Result<(), DbError>;

    /// Tear down and re-open the transport, restoring session state
    /// (selected database, prepared statements) the client tracks.
    fn reconnect(&mut self) -> Result<(), DbError>;
}

/// Database operations issued over a [`Transport`].
pub trait Connection: Transport {
    /// Server-side prepared statement handle.
    type Statement;

    fn use_db(&mut self, name: &str) -> Result<(), DbError>;

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryOutput, DbError>;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement, DbError>;

    /// Execute a statement previously prepared on this connection.
    fn execute(&mut self, stmt: &Self::Statement, params: &[Value])
        -> Result<QueryOutput, DbError>;
}
