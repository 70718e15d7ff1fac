//! Two-stage device verification.
//!
//! 1. Probe the LinkPlay TCP port (cheap, bounded by a short timeout).
//! 2. Only if it is open, ask for `getStatus` and require a non-empty JSON
//!    object in return.
//!
//! Other services share port 8080, so an open port alone never confirms a
//! device.

use std::net::{Ipv4Addr, SocketAddr};

use linkplay_api::{CommandClient, Reply};

use crate::config::DiscoveryConfig;
use crate::probe::{PortProber, TcpProber};
use crate::ConfirmedDevice;

/// Decides whether an address is a compatible speaker
pub trait Verifier: Send + Sync {
    fn verify(&self, ip: Ipv4Addr) -> Option<ConfirmedDevice>;
}

impl<F> Verifier for F
where
    F: Fn(Ipv4Addr) -> Option<ConfirmedDevice> + Send + Sync,
{
    fn verify(&self, ip: Ipv4Addr) -> Option<ConfirmedDevice> {
        self(ip)
    }
}

/// Source of the status reply used in the second stage
pub trait StatusSource: Send + Sync {
    fn status(&self, ip: Ipv4Addr) -> Option<Reply>;
}

impl StatusSource for CommandClient {
    fn status(&self, ip: Ipv4Addr) -> Option<Reply> {
        self.get_status(&ip.to_string())
    }
}

/// Port probe followed by a status query
#[derive(Debug, Clone)]
pub struct DeviceVerifier<P = TcpProber, S = CommandClient> {
    prober: P,
    status: S,
    probe_port: u16,
    command_port: u16,
}

impl DeviceVerifier {
    /// Verifier using the probe and command settings of `config`
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let client = CommandClient::new()
            .with_port(config.command_port)
            .with_timeout(config.verify_timeout);

        Self::with_parts(
            TcpProber::new(config.probe_timeout),
            client,
            config.probe_port,
            config.command_port,
        )
    }
}

impl<P: PortProber, S: StatusSource> DeviceVerifier<P, S> {
    pub fn with_parts(prober: P, status: S, probe_port: u16, command_port: u16) -> Self {
        Self {
            prober,
            status,
            probe_port,
            command_port,
        }
    }
}

impl<P: PortProber, S: StatusSource> Verifier for DeviceVerifier<P, S> {
    fn verify(&self, ip: Ipv4Addr) -> Option<ConfirmedDevice> {
        if !self.prober.is_open(SocketAddr::from((ip, self.probe_port))) {
            return None;
        }

        let reply = self.status.status(ip)?;
        if !reply.has_fields() {
            tracing::debug!("{} has port {} open but no status payload", ip, self.probe_port);
            return None;
        }

        let status = reply.into_structured()?;
        tracing::debug!("{} confirmed", ip);
        Some(ConfirmedDevice::new(ip, self.command_port, status))
    }
}
