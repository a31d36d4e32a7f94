//! Reconnect loop: connect if needed, run an operation, reconnect and repeat
//! on network failure until success, a non-network error, or the budget is spent.

use std::sync::Arc;

use super::classify::is_network_error;
use super::error::DbError;
use super::observer::{RetryEvent, RetryObserver, TracingObserver};
use super::policy::{Backoff, RetryBudget};
use crate::config::ReconnectConfig;
use crate::connection::{Connection, QueryOutput, Transport, Value};
use crate::control::{self, CancelToken};

/// Shared reconnect policy for one connection: budget, backoff, observer and
/// an optional cancel token.
pub struct Reconnector<'a> {
    max_retries: u32,
    backoff: Backoff,
    observer: &'a dyn RetryObserver,
    cancel: Option<&'a CancelToken>,
}

impl<'a> Reconnector<'a> {
    pub fn new(config: &ReconnectConfig, observer: &'a dyn RetryObserver) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: config.backoff.policy(),
            observer,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fresh budget for one logical call.
    pub fn budget(&self) -> RetryBudget {
        RetryBudget::new(self.max_retries)
    }

    /// While `result` holds a network error and budget remains: wait, reconnect,
    /// and replace `result` with the reconnect outcome.
    ///
    /// On return `result` is `Ok` (reconnected), a non-network error (reconnect
    /// failed for another reason, or cancelled), or the last network error once
    /// the budget is spent.
    pub fn reconnect_loop<T: Transport + ?Sized>(
        &self,
        conn: &mut T,
        budget: &mut RetryBudget,
        result: &mut Result<(), DbError>,
    ) {
        loop {
            let error = match &*result {
                Err(e) if is_network_error(e) => e.to_string(),
                _ => return,
            };
            if !budget.has_remaining() {
                self.observer.on_event(&RetryEvent::Exhausted {
                    attempts: budget.attempts(),
                    error,
                });
                return;
            }

            let attempt = budget.attempts();
            let delay = self.backoff.delay(attempt);
            self.observer.on_event(&RetryEvent::Reconnecting {
                attempt,
                delay,
                error,
            });
            if let Err(e) = self.wait(delay) {
                *result = Err(e);
                return;
            }

            *result = conn.reconnect();
            match &*result {
                Ok(()) => self.observer.on_event(&RetryEvent::Reconnected { attempt }),
                Err(e) => self.observer.on_event(&RetryEvent::ReconnectFailed {
                    attempt,
                    error: e.to_string(),
                }),
            }
            budget.record_attempt();
        }
    }

    /// Connect if no transport handle is present. No-op otherwise.
    pub fn ensure_connected<T: Transport + ?Sized>(
        &self,
        conn: &mut T,
        budget: &mut RetryBudget,
    ) -> Result<(), DbError> {
        if conn.is_connected() {
            return Ok(());
        }
        tracing::debug!("no transport handle, connecting");
        let mut result = conn.connect();
        self.reconnect_loop(conn, budget, &mut result);
        result
    }

    /// Run `op` as one logical call with a fresh budget.
    pub fn run<C, T, F>(&self, conn: &mut C, op: F) -> Result<T, DbError>
    where
        C: Transport + ?Sized,
        F: FnMut(&mut C) -> Result<T, DbError>,
    {
        let mut budget = self.budget();
        self.run_with_budget(conn, &mut budget, op)
    }

    /// Run `op` against `budget`, which is shared by the connect phase and every
    /// retry of `op`. `op` is retried once per successful reconnect.
    pub fn run_with_budget<C, T, F>(
        &self,
        conn: &mut C,
        budget: &mut RetryBudget,
        mut op: F,
    ) -> Result<T, DbError>
    where
        C: Transport + ?Sized,
        F: FnMut(&mut C) -> Result<T, DbError>,
    {
        self.ensure_connected(&mut *conn, budget)?;
        loop {
            let err = match op(&mut *conn) {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            let mut result = Err(err);
            self.reconnect_loop(&mut *conn, budget, &mut result);
            result?;
        }
    }

    fn wait(&self, delay: std::time::Duration) -> Result<(), DbError> {
        match self.cancel {
            Some(token) => control::sleep_cancellable(delay, token),
            None => {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                Ok(())
            }
        }
    }
}

/// Auto-reconnecting versions of the [`Connection`] operations.
pub trait AutoConnect: Connection {
    fn use_ac(&mut self, r: &Reconnector<'_>, name: &str) -> Result<(), DbError> {
        r.run(self, |c| c.use_db(name))
    }

    fn query_ac(
        &mut self,
        r: &Reconnector<'_>,
        sql: &str,
        params: &[Value],
    ) -> Result<QueryOutput, DbError> {
        r.run(self, |c| c.query(sql, params))
    }

    fn prepare_ac(&mut self, r: &Reconnector<'_>, sql: &str) -> Result<Self::Statement, DbError> {
        r.run(self, |c| c.prepare(sql))
    }

    fn execute_ac(
        &mut self,
        r: &Reconnector<'_>,
        stmt: &Self::Statement,
        params: &[Value],
    ) -> Result<QueryOutput, DbError> {
        r.run(self, |c| c.execute(stmt, params))
    }
}

impl<C: Connection> AutoConnect for C {}

/// Owns a connection together with its reconnect settings.
///
/// Every method is one logical call. Calls take `&mut self`, so a single
/// `AutoConn` is never reconnected underneath a concurrent user.
pub struct AutoConn<C> {
    conn: C,
    config: ReconnectConfig,
    observer: Arc<dyn RetryObserver>,
    cancel: Option<CancelToken>,
}

impl<C: Connection> AutoConn<C> {
    pub fn new(conn: C, config: ReconnectConfig) -> Self {
        let observer: Arc<dyn RetryObserver> = Arc::new(TracingObserver::new(config.debug));
        Self {
            conn,
            config,
            observer,
            cancel: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &ReconnectConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &C {
        &self.conn
    }

    pub fn get_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    fn split(&mut self) -> (&mut C, Reconnector<'_>) {
        let mut r = Reconnector::new(&self.config, self.observer.as_ref());
        if let Some(token) = &self.cancel {
            r = r.with_cancel(token);
        }
        (&mut self.conn, r)
    }

    pub fn ensure_connected(&mut self) -> Result<(), DbError> {
        let (conn, r) = self.split();
        let mut budget = r.budget();
        r.ensure_connected(conn, &mut budget)
    }

    pub fn use_db(&mut self, name: &str) -> Result<(), DbError> {
        let (conn, r) = self.split();
        conn.use_ac(&r, name)
    }

    pub fn query(&mut self, sql: &str, params: &[Value]) -> Result<QueryOutput, DbError> {
        let (conn, r) = self.split();
        conn.query_ac(&r, sql, params)
    }

    pub fn prepare(&mut self, sql: &str) -> Result<C::Statement, DbError> {
        let (conn, r) = self.split();
        conn.prepare_ac(&r, sql)
    }

    pub fn execute(&mut self, stmt: &C::Statement, params: &[Value]) -> Result<QueryOutput, DbError> {
        let (conn, r) = self.split();
        conn.execute_ac(&r, stmt, params)
    }
}
