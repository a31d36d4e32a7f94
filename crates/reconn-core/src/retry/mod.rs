//! Reconnect and retry policy.
//!
//! This module encapsulates network-error classification and the bounded
//! reconnect-with-backoff loop so that every auto-reconnecting operation
//! (select database, query, prepare, execute) shares one consistent policy.

mod classify;
mod error;
mod observer;
mod policy;
mod run;

pub use classify::{classify, is_network_error, ErrorKind};
pub use error::DbError;
pub use observer::{RecordingObserver, RetryEvent, RetryObserver, TracingObserver};
pub use policy::{Backoff, RetryBudget};
pub use run::{AutoConn, AutoConnect, Reconnector};
