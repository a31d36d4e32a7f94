//! Replaceable transport dialer.
//!
//! Platforms that cannot open plain sockets (sandboxed hosts, managed SQL
//! proxies) install their own [`Dialer`]; everything else uses [`TcpDialer`].
//! [`ProbeTransport`] drives a dialer through the reconnect loop without any
//! database protocol on top.

use std::io;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::DialConfig;
use crate::connection::Transport;
use crate::retry::DbError;

/// Where and how to open the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialTarget {
    pub proto: String,
    /// Local address hint for custom dialers. [`TcpDialer`] does not bind.
    pub laddr: Option<String>,
    pub raddr: String,
    pub user: String,
    pub dbname: String,
    /// Zero means no timeout.
    pub timeout: Duration,
}

impl DialTarget {
    pub fn tcp(raddr: impl Into<String>, cfg: &DialConfig) -> Self {
        Self {
            proto: cfg.proto.clone(),
            laddr: cfg.laddr.clone(),
            raddr: raddr.into(),
            user: String::new(),
            dbname: String::new(),
            timeout: Duration::from_millis(cfg.timeout_ms),
        }
    }
}

pub trait Dialer {
    fn dial(&self, target: &DialTarget) -> io::Result<TcpStream>;
}

impl<F> Dialer for F
where
    F: Fn(&DialTarget) -> io::Result<TcpStream>,
{
    fn dial(&self, target: &DialTarget) -> io::Result<TcpStream> {
        self(target)
    }
}

/// Connects over TCP, trying each resolved address in turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

impl Dialer for TcpDialer {
    fn dial(&self, target: &DialTarget) -> io::Result<TcpStream> {
        if target.proto != "tcp" {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported protocol {:?}", target.proto),
            ));
        }
        let mut last_err = None;
        for addr in target.raddr.to_socket_addrs()? {
            let dialed = if target.timeout.is_zero() {
                TcpStream::connect(addr)
            } else {
                TcpStream::connect_timeout(&addr, target.timeout)
            };
            match dialed {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::debug!(%addr, "dial failed: {}", e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses for {}", target.raddr),
            )
        }))
    }
}

/// A transport that only opens a socket. Useful to check reachability with the
/// same budget and backoff an auto-reconnecting client would use.
pub struct ProbeTransport<D> {
    target: DialTarget,
    dialer: D,
    stream: Option<TcpStream>,
}

impl<D: Dialer> ProbeTransport<D> {
    pub fn new(target: DialTarget, dialer: D) -> Self {
        Self {
            target,
            dialer,
            stream: None,
        }
    }

    pub fn target(&self) -> &DialTarget {
        &self.target
    }

    pub fn peer_addr(&self) -> Option<std::net::SocketAddr> {
        self.stream.as_ref().and_then(|s| s.peer_addr().ok())
    }

    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl<D: Dialer> Transport for ProbeTransport<D> {
    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn connect(&mut self) -> Result<(), DbError> {
        let stream = self.dialer.dial(&self.target).map_err(|e| match e.kind() {
            // Bad target, not network-class.
            io::ErrorKind::Unsupported | io::ErrorKind::InvalidInput => DbError::Other(e.into()),
            _ => DbError::Net(e),
        })?;
        self.stream = Some(stream);
        Ok(())
    }

    fn reconnect(&mut self) -> Result<(), DbError> {
        self.close();
        self.connect()
    }
}
