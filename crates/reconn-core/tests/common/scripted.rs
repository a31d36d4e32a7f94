//! In-memory connection whose connect, reconnect and operation outcomes are
//! scripted up front. Outcomes are consumed in order; an empty script succeeds.

use std::collections::VecDeque;
use std::io;

use reconn_core::config::{BackoffConfig, ReconnectConfig};
use reconn_core::{Connection, DbError, QueryOutput, QueryResult, Transport, Value};

#[derive(Debug, Default)]
pub struct ScriptedConnection {
    connected: bool,
    connect_script: VecDeque<Result<(), DbError>>,
    reconnect_script: VecDeque<Result<(), DbError>>,
    op_script: VecDeque<Result<(), DbError>>,
    payload: QueryOutput,
    next_stmt: u32,
    pub connects: u32,
    pub reconnects: u32,
    pub ops: u32,
    /// Operations invoked without a transport handle.
    pub ops_while_disconnected: u32,
    /// Call names in order, e.g. `["connect", "query", "reconnect", "query"]`.
    pub calls: Vec<String>,
    pub current_db: Option<String>,
}

impl ScriptedConnection {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connect_results(mut self, results: Vec<Result<(), DbError>>) -> Self {
        self.connect_script = results.into();
        self
    }

    pub fn reconnect_results(mut self, results: Vec<Result<(), DbError>>) -> Self {
        self.reconnect_script = results.into();
        self
    }

    /// Reconnect fails with a network error forever.
    pub fn reconnect_always_fails(mut self) -> Self {
        self.reconnect_script = (0..1000).map(|_| Err(net_err())).collect();
        self
    }

    pub fn op_results(mut self, results: Vec<Result<(), DbError>>) -> Self {
        self.op_script = results.into();
        self
    }

    pub fn payload(mut self, payload: QueryOutput) -> Self {
        self.payload = payload;
        self
    }

    fn link_outcome(&mut self, next: Option<Result<(), DbError>>) -> Result<(), DbError> {
        let result = next.unwrap_or(Ok(()));
        self.connected = result.is_ok();
        result
    }

    fn op(&mut self, name: &str) -> Result<(), DbError> {
        self.calls.push(name.to_string());
        self.ops += 1;
        if !self.connected {
            self.ops_while_disconnected += 1;
        }
        self.op_script.pop_front().unwrap_or(Ok(()))
    }
}

impl Transport for ScriptedConnection {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), DbError> {
        self.calls.push("connect".to_string());
        self.connects += 1;
        let next = self.connect_script.pop_front();
        self.link_outcome(next)
    }

    fn reconnect(&mut self) -> Result<(), DbError> {
        self.calls.push("reconnect".to_string());
        self.reconnects += 1;
        let next = self.reconnect_script.pop_front();
        self.link_outcome(next)
    }
}

impl Connection for ScriptedConnection {
    type Statement = u32;

    fn use_db(&mut self, name: &str) -> Result<(), DbError> {
        self.op("use")?;
        self.current_db = Some(name.to_string());
        Ok(())
    }

    fn query(&mut self, _sql: &str, _params: &[Value]) -> Result<QueryOutput, DbError> {
        self.op("query")?;
        Ok(self.payload.clone())
    }

    fn prepare(&mut self, _sql: &str) -> Result<u32, DbError> {
        self.op("prepare")?;
        self.next_stmt += 1;
        Ok(self.next_stmt)
    }

    fn execute(&mut self, stmt: &u32, _params: &[Value]) -> Result<QueryOutput, DbError> {
        self.op("execute")?;
        let mut out = self.payload.clone();
        out.result.insert_id = u64::from(*stmt);
        Ok(out)
    }
}

pub fn net_err() -> DbError {
    DbError::Net(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"))
}

pub fn eof() -> DbError {
    DbError::UnexpectedEof
}

/// Linear backoff in 1ms steps so tests stay fast while delays stay distinct.
pub fn fast_config(max_retries: u32) -> ReconnectConfig {
    ReconnectConfig {
        max_retries,
        debug: true,
        backoff: BackoffConfig {
            unit_ms: 1,
            ..BackoffConfig::default()
        },
    }
}

pub fn payload(marker: &str) -> QueryOutput {
    QueryOutput {
        rows: vec![vec![Value::Int(1), Value::from(marker)]],
        result: QueryResult {
            affected_rows: 0,
            insert_id: 0,
            columns: vec!["id".to_string(), "name".to_string()],
        },
    }
}
