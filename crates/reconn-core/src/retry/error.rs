//! Error type shared by the wrapped client and the reconnect loop.

use thiserror::Error;

/// Error returned by a connection capability (connect, reconnect, query, ...).
///
/// The reconnect loop never wraps these: whichever value ends a logical call is
/// handed back to the caller as-is so it stays classifiable.
#[derive(Debug, Error)]
pub enum DbError {
    /// The server stream was closed or truncated mid-read.
    #[error("unexpected end of stream")]
    UnexpectedEof,
    /// Socket-level failure (reset, refused, timeout, DNS, ...).
    #[error("network: {0}")]
    Net(#[from] std::io::Error),
    /// Error packet returned by the server.
    #[error("server error {code}: {message}")]
    Server { code: u16, message: String },
    /// Malformed or unexpected packet.
    #[error("protocol: {0}")]
    Protocol(String),
    /// A backoff wait was interrupted by a cancel token.
    #[error("operation cancelled")]
    Cancelled,
    /// Anything else the client reports.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    pub fn server(code: u16, message: impl Into<String>) -> Self {
        DbError::Server {
            code,
            message: message.into(),
        }
    }
}
