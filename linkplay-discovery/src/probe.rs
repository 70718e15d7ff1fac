//! Bounded-time TCP port probing.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Answers "is anything listening on this port?"
pub trait PortProber: Send + Sync {
    /// `true` only if a connection was established in time
    fn is_open(&self, addr: SocketAddr) -> bool;
}

/// Probes with a plain TCP connect and a fixed timeout
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PortProber for TcpProber {
    fn is_open(&self, addr: SocketAddr) -> bool {
        is_port_open(addr, self.timeout)
    }
}

/// Attempt a TCP connection to `addr`, giving up after `timeout`
///
/// Refused, timed out, unreachable: all of them read as closed.
pub fn is_port_open(addr: SocketAddr, timeout: Duration) -> bool {
    // connect_timeout rejects a zero duration
    let timeout = timeout.max(Duration::from_millis(1));

    match TcpStream::connect_timeout(&addr, timeout) {
        Ok(_) => true,
        Err(e) => {
            tracing::trace!("{} closed: {}", addr, e);
            false
        }
    }
}
