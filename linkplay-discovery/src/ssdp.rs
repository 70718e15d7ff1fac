//! SSDP (Simple Service Discovery Protocol) search for LinkPlay renderers
//!
//! One M-SEARCH is sent to the multicast group, then replies are collected
//! until the listening window closes. A reply only counts if its text
//! mentions one of [`DEVICE_MARKERS`]; plenty of unrelated UPnP devices
//! answer a MediaRenderer search.

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};

/// Substrings that identify a compatible device advertisement
pub const DEVICE_MARKERS: [&str; 2] = ["MediaRenderer", "LinkPlay"];

/// A decoded reply and the address it came from
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SsdpReply {
    pub from: SocketAddr,
    pub text: String,
}

impl SsdpReply {
    /// Decode a datagram, replacing invalid UTF-8 instead of failing
    pub fn decode(from: SocketAddr, payload: &[u8]) -> Self {
        Self {
            from,
            text: String::from_utf8_lossy(payload).into_owned(),
        }
    }

    pub fn is_device(&self) -> bool {
        is_device_advertisement(&self.text)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.text
            .lines()
            .find_map(|line| extract_header_value(line.trim(), name))
    }
}

/// SSDP client for device discovery
pub(crate) struct SsdpClient {
    socket: UdpSocket,
    target: SocketAddr,
    window: Duration,
}

impl SsdpClient {
    /// Bind an ephemeral UDP socket configured for one search
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::Network(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_multicast_ttl_v4(config.multicast_ttl)
            .map_err(|e| DiscoveryError::Network(format!("Failed to set multicast TTL: {}", e)))?;

        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::Network(format!("Failed to set multicast loop: {}", e)))?;

        Ok(Self {
            socket,
            target: config.multicast_addr,
            window: config.multicast_window,
        })
    }

    /// Send an M-SEARCH request and return an iterator of replies
    pub fn search(&self, search_target: &str) -> Result<SsdpReplyIterator<'_>> {
        let request = search_request(self.target, search_target);

        self.socket
            .send_to(request.as_bytes(), self.target)
            .map_err(|e| DiscoveryError::Network(format!("Failed to send M-SEARCH: {}", e)))?;

        Ok(SsdpReplyIterator::new(&self.socket, Instant::now() + self.window))
    }
}

/// Yields replies until the deadline passes or a read times out
pub(crate) struct SsdpReplyIterator<'a> {
    socket: &'a UdpSocket,
    buffer: [u8; 4096],
    deadline: Instant,
    finished: bool,
}

impl<'a> SsdpReplyIterator<'a> {
    fn new(socket: &'a UdpSocket, deadline: Instant) -> Self {
        Self {
            socket,
            buffer: [0; 4096],
            deadline,
            finished: false,
        }
    }
}

impl<'a> Iterator for SsdpReplyIterator<'a> {
    type Item = SsdpReply;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || self.socket.set_read_timeout(Some(remaining)).is_err() {
            self.finished = true;
            return None;
        }

        match self.socket.recv_from(&mut self.buffer) {
            Ok((size, from)) => Some(SsdpReply::decode(from, &self.buffer[..size])),
            Err(e) => {
                // A read timeout is how the window closes
                if e.kind() != std::io::ErrorKind::WouldBlock
                    && e.kind() != std::io::ErrorKind::TimedOut
                {
                    tracing::warn!("SSDP receive failed: {}", e);
                }
                self.finished = true;
                None
            }
        }
    }
}

/// Run one multicast search and return the advertising addresses
///
/// Failures to set up or send are logged and produce an empty list.
pub fn search(config: &DiscoveryConfig) -> Vec<Ipv4Addr> {
    let client = match SsdpClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Multicast discovery unavailable: {}", e);
            return Vec::new();
        }
    };

    let replies = match client.search(&config.search_target) {
        Ok(replies) => replies,
        Err(e) => {
            tracing::warn!("Multicast discovery unavailable: {}", e);
            return Vec::new();
        }
    };

    collect_devices(replies)
}

/// Keep marker-bearing replies from IPv4 senders, first sighting wins
pub(crate) fn collect_devices(replies: impl IntoIterator<Item = SsdpReply>) -> Vec<Ipv4Addr> {
    let mut seen = HashSet::new();
    let mut devices = Vec::new();

    for reply in replies {
        if !reply.is_device() {
            tracing::trace!("Ignoring SSDP reply from {}", reply.from);
            continue;
        }

        let SocketAddr::V4(from) = reply.from else {
            continue;
        };

        if seen.insert(*from.ip()) {
            tracing::debug!(
                "SSDP: found device at {} (server: {})",
                from.ip(),
                reply.header("SERVER:").unwrap_or_default()
            );
            devices.push(*from.ip());
        }
    }

    devices
}

/// Build the M-SEARCH request text
pub(crate) fn search_request(host: SocketAddr, search_target: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: 3\r\n\
         ST: {}\r\n\
         \r\n",
        host, search_target
    )
}

/// Whether reply text advertises a compatible device
pub fn is_device_advertisement(text: &str) -> bool {
    DEVICE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Extract header value from a line like "HEADER: value"
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    if line.len() > header.len()
        && line.is_char_boundary(header.len())
        && line[..header.len()].eq_ignore_ascii_case(header)
    {
        Some(line[header.len()..].trim().to_string())
    } else {
        None
    }
}
