//! Classify client errors into network-class and everything else.

use super::error::DbError;
use std::io;

/// High-level classification of a [`DbError`] for reconnect decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stream terminated unexpectedly (closed or truncated mid-read).
    UnexpectedEof,
    /// Socket/OS-level failure: reset, refused, timeout, DNS, etc.
    Transport,
    /// Caller cancelled a pending wait.
    Cancelled,
    /// Server, protocol or application error. Never reconnected.
    Other,
}

/// Classify a client error.
pub fn classify(e: &DbError) -> ErrorKind {
    match e {
        DbError::UnexpectedEof => ErrorKind::UnexpectedEof,
        DbError::Net(e) if e.kind() == io::ErrorKind::UnexpectedEof => ErrorKind::UnexpectedEof,
        DbError::Net(_) => ErrorKind::Transport,
        DbError::Cancelled => ErrorKind::Cancelled,
        DbError::Server { .. } | DbError::Protocol(_) | DbError::Other(_) => ErrorKind::Other,
    }
}

/// True when `e` means the transport failed and a reconnect may help.
pub fn is_network_error(e: &DbError) -> bool {
    matches!(
        classify(e),
        ErrorKind::UnexpectedEof | ErrorKind::Transport
    )
}
