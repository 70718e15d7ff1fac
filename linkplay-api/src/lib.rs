//! Command client for LinkPlay-based WiFi speakers
//!
//! LinkPlay firmware exposes a single HTTP endpoint, `/httpapi.asp`, that
//! takes the whole command in the `command` query parameter:
//!
//! ```text
//! GET http://192.168.1.50/httpapi.asp?command=setPlayerCmd:vol:30
//! ```
//!
//! [`CommandClient::send`] issues one such request and normalises the reply.
//! Every failure (refused connection, timeout, non-200 status) comes back as
//! `None`, so callers only ever check for presence.
//!
//! ```no_run
//! use linkplay_api::CommandClient;
//!
//! let client = CommandClient::new();
//! if let Some(reply) = client.get_status("192.168.1.50") {
//!     println!("{:?}", reply.get_str("DeviceName"));
//! }
//! client.set_volume("192.168.1.50", 25);
//! ```

mod command;
mod error;
mod naming;
mod reply;

pub use command::{hex_lower, Command, VOLUME_MAX, VOLUME_MIN};
pub use error::{ApiError, Result};
pub use naming::NamingOutcome;
pub use reply::{Reply, StatusMap, RAW_KEY};

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Fixed path of the vendor command endpoint
pub const COMMAND_PATH: &str = "/httpapi.asp";

/// Default HTTP port for command requests
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bytes escaped in the `command` query value
///
/// `:` and `=` stay literal since they delimit the vendor command syntax.
const COMMAND_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Blocking client for the `httpapi.asp` command endpoint
#[derive(Debug, Clone)]
pub struct CommandClient {
    agent: ureq::Agent,
    port: u16,
    timeout: Duration,
}

impl Default for CommandClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandClient {
    /// Create a client on port 80 with a 5 second timeout
    pub fn new() -> Self {
        Self::build(DEFAULT_HTTP_PORT, DEFAULT_TIMEOUT)
    }

    /// Same client with a different per-request timeout
    ///
    /// Bulk callers such as the network scanner use a shorter value.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self::build(self.port, timeout)
    }

    /// Same client targeting a different HTTP port
    pub fn with_port(self, port: u16) -> Self {
        Self { port, ..self }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build(port: u16, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout(timeout)
                .build(),
            port,
            timeout,
        }
    }

    /// Request URL for `command` on the device at `ip`
    pub fn command_url(&self, ip: &str, command: &Command) -> Result<String> {
        let ip: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidAddress(ip.to_string()))?;

        Ok(format!(
            "http://{}{}?command={}",
            SocketAddr::new(ip, self.port),
            COMMAND_PATH,
            utf8_percent_encode(&command.to_string(), COMMAND_ESCAPES)
        ))
    }

    /// Send a command and report why it failed, if it did
    pub fn try_send(&self, ip: &str, command: &Command) -> Result<Reply> {
        self.try_fetch(ip, command).map(|body| Reply::from_body(&body))
    }

    /// Send a command and return the body exactly as the device sent it
    pub fn try_fetch(&self, ip: &str, command: &Command) -> Result<String> {
        let url = self.command_url(ip, command)?;

        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => ApiError::Status(code),
            ureq::Error::Transport(t) => ApiError::Network(t.to_string()),
        })?;

        if response.status() != 200 {
            return Err(ApiError::Status(response.status()));
        }

        response
            .into_string()
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Send a command; `None` means no usable answer
    pub fn send(&self, ip: &str, command: &Command) -> Option<Reply> {
        match self.try_send(ip, command) {
            Ok(reply) => {
                tracing::debug!("{} answered {}", ip, command.name());
                Some(reply)
            }
            Err(e) => {
                tracing::debug!("{} gave no answer to {}: {}", ip, command.name(), e);
                None
            }
        }
    }

    /// Send an already formed command string such as `setPlayerCmd:vol:10`
    pub fn send_raw(&self, ip: &str, command: &str) -> Option<Reply> {
        self.send(ip, &Command::from(command))
    }

    pub fn get_status(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::get_status())
    }

    pub fn get_status_ex(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::get_status_ex())
    }

    pub fn get_player_status(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::get_player_status())
    }

    /// Set volume; out-of-range levels are clamped to 0..=100
    pub fn set_volume(&self, ip: &str, level: i32) -> Option<Reply> {
        self.send(ip, &Command::set_volume(level))
    }

    pub fn play(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::play())
    }

    pub fn pause(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::pause())
    }

    pub fn next_track(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::next_track())
    }

    pub fn prev_track(&self, ip: &str) -> Option<Reply> {
        self.send(ip, &Command::prev_track())
    }
}
