//! Port-level diagnostics for a single address.
//!
//! Used when discovery finds nothing and the user knows (or guesses) a
//! speaker's address. Only data is returned; presentation is up to the caller.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use linkplay_api::{Command, CommandClient};
use serde::Serialize;

use crate::probe::is_port_open;

/// Ports worth checking on a LinkPlay device
pub const DIAGNOSTIC_PORTS: [DiagnosticPort; 3] = [
    DiagnosticPort { port: 8080, label: "LinkPlay HTTP", http: true },
    DiagnosticPort { port: 80, label: "HTTP", http: true },
    DiagnosticPort { port: 49152, label: "UPnP", http: false },
];

/// Timeout used for each probe and request
pub const DIAGNOSTIC_TIMEOUT: Duration = Duration::from_secs(2);

/// Longest API reply excerpt kept in a report
const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticPort {
    pub port: u16,
    pub label: &'static str,
    /// Whether `httpapi.asp` is worth trying on this port
    pub http: bool,
}

/// Outcome of checking one port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortReport {
    pub port: u16,
    pub label: &'static str,
    pub open: bool,
    /// First characters of the raw `getStatus` body, when one came back
    pub api_response: Option<String>,
}

/// Check the standard LinkPlay ports on `ip`
pub fn diagnose(ip: Ipv4Addr) -> Vec<PortReport> {
    diagnose_ports(ip, &DIAGNOSTIC_PORTS, DIAGNOSTIC_TIMEOUT)
}

/// Check `ports` on `ip`, querying `getStatus` on open HTTP ports
pub fn diagnose_ports(
    ip: Ipv4Addr,
    ports: &[DiagnosticPort],
    timeout: Duration,
) -> Vec<PortReport> {
    ports
        .iter()
        .map(|target| {
            let open = is_port_open(SocketAddr::from((ip, target.port)), timeout);

            let api_response = if open && target.http {
                CommandClient::new()
                    .with_port(target.port)
                    .with_timeout(timeout)
                    .try_fetch(&ip.to_string(), &Command::get_status())
                    .ok()
                    .map(|body| body.chars().take(EXCERPT_CHARS).collect())
            } else {
                None
            };

            tracing::debug!("{}:{} ({}) open={}", ip, target.port, target.label, open);
            PortReport {
                port: target.port,
                label: target.label,
                open,
                api_response,
            }
        })
        .collect()
}
