//! Speaker handle with command shortcuts

use std::net::Ipv4Addr;

use linkplay_api::{Command, CommandClient, NamingOutcome, Reply};
use linkplay_discovery::ConfirmedDevice;

use crate::SdkError;

/// A controllable speaker
///
/// Holds the address and what discovery learned about the device. Every
/// command goes straight to the device; nothing is cached and nothing is
/// retried.
///
/// # Example
///
/// ```rust,ignore
/// let speaker = Speaker::connect("192.168.1.50")?;
/// speaker.set_volume(25);
/// speaker.pause();
/// ```
#[derive(Debug, Clone)]
pub struct Speaker {
    /// IP address of the speaker
    pub ip: Ipv4Addr,
    /// Friendly name, if discovery learned it
    pub name: Option<String>,
    /// Hardware model, if discovery learned it
    pub model: Option<String>,
    client: CommandClient,
}

impl Speaker {
    /// Handle for a known address, without contacting the device
    pub fn new(ip: Ipv4Addr) -> Self {
        Self::with_client(ip, CommandClient::new())
    }

    /// Handle using a specific command client (port, timeout)
    pub fn with_client(ip: Ipv4Addr, client: CommandClient) -> Self {
        Self {
            ip,
            name: None,
            model: None,
            client,
        }
    }

    /// Parse `ip` and build a handle
    pub fn connect(ip: &str) -> Result<Self, SdkError> {
        let ip = ip
            .trim()
            .parse()
            .map_err(|_| SdkError::InvalidIpAddress(ip.to_string()))?;
        Ok(Self::new(ip))
    }

    /// Handle for a discovered device
    pub fn from_device(device: &ConfirmedDevice) -> Self {
        Self {
            name: device.name().map(str::to_string),
            model: device.model().map(str::to_string),
            ..Self::with_client(device.ip, CommandClient::new().with_port(device.port))
        }
    }

    /// Name if known, otherwise the address
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.ip.to_string())
    }

    /// Send any command
    pub fn send(&self, command: &Command) -> Option<Reply> {
        self.client.send(&self.ip.to_string(), command)
    }

    /// Send any command, reporting why it failed
    pub fn try_send(&self, command: &Command) -> Result<Reply, SdkError> {
        Ok(self.client.try_send(&self.ip.to_string(), command)?)
    }

    /// `getStatus`
    pub fn status(&self) -> Option<Reply> {
        self.send(&Command::get_status())
    }

    /// `getStatusEx`
    pub fn status_ex(&self) -> Option<Reply> {
        self.send(&Command::get_status_ex())
    }

    /// `getPlayerStatus`
    pub fn player_status(&self) -> Option<Reply> {
        self.send(&Command::get_player_status())
    }

    /// Set volume, clamped to 0..=100
    pub fn set_volume(&self, level: i32) -> Option<Reply> {
        self.send(&Command::set_volume(level))
    }

    pub fn play(&self) -> Option<Reply> {
        self.send(&Command::play())
    }

    pub fn pause(&self) -> Option<Reply> {
        self.send(&Command::pause())
    }

    pub fn next_track(&self) -> Option<Reply> {
        self.send(&Command::next_track())
    }

    pub fn prev_track(&self) -> Option<Reply> {
        self.send(&Command::prev_track())
    }

    /// Best-effort rename; see [`CommandClient::set_device_name`]
    pub fn set_name(&mut self, name: &str) -> Option<NamingOutcome> {
        let outcome = self.client.set_device_name(&self.ip.to_string(), name)?;

        // Read back what the device now reports
        self.name = self
            .status()
            .and_then(|reply| reply.get_str("DeviceName").map(str::to_string))
            .or_else(|| Some(name.to_string()));

        Some(outcome)
    }
}
