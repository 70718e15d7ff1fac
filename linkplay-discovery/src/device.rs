//! Confirmed devices and the status fields read from them.

use std::net::Ipv4Addr;

use linkplay_api::StatusMap;
use serde::Serialize;

/// A speaker that answered discovery.
///
/// Devices confirmed by the active scan carry the `getStatus` payload they
/// answered with. Devices announced over multicast are taken at their word
/// and carry an empty status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedDevice {
    /// IPv4 address of the device
    pub ip: Ipv4Addr,
    /// HTTP port for `httpapi.asp` commands (typically 80)
    pub port: u16,
    /// Status payload returned during verification
    pub status: StatusMap,
}

impl ConfirmedDevice {
    pub fn new(ip: Ipv4Addr, port: u16, status: StatusMap) -> Self {
        Self { ip, port, status }
    }

    /// Device announced over multicast, not yet queried
    pub fn announced(ip: Ipv4Addr, port: u16) -> Self {
        Self::new(ip, port, StatusMap::new())
    }

    /// Friendly name (`DeviceName`)
    pub fn name(&self) -> Option<&str> {
        self.field("DeviceName")
    }

    /// Hardware model (`hardware`)
    pub fn model(&self) -> Option<&str> {
        self.field("hardware")
    }

    /// Firmware version (`firmware`)
    pub fn firmware(&self) -> Option<&str> {
        self.field("firmware")
    }

    /// MAC address (`MAC`)
    pub fn mac(&self) -> Option<&str> {
        self.field("MAC")
    }

    /// Base URL of the command endpoint
    pub fn api_url(&self) -> String {
        format!("http://{}:{}{}", self.ip, self.port, linkplay_api::COMMAND_PATH)
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.status.get(key)?.as_str()
    }
}
