//! # LinkPlay SDK
//!
//! Discover LinkPlay-based WiFi speakers and send them commands. Fully
//! synchronous; no async runtime is needed.
//!
//! ```rust,no_run
//! use linkplay_sdk::{discover, send, Speaker};
//!
//! let devices = discover();
//! if let Some(device) = devices.first() {
//!     let speaker = Speaker::from_device(device);
//!     speaker.set_volume(30);
//!     speaker.play();
//!
//!     // Raw protocol access: command name plus colon-separated parameters
//!     let reply = send(&device.ip.to_string(), "setPlayerCmd", &["vol", "20"]);
//!     println!("{:?}", reply);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! linkplay-sdk (discover / send / Speaker)
//!     ↓
//! linkplay-discovery (multicast → active scan → verification)
//!     ↓
//! linkplay-api (httpapi.asp command client)
//! ```

pub mod logging;

mod error;
mod speaker;

pub use error::SdkError;
pub use speaker::Speaker;

pub use linkplay_api::{Command, CommandClient, NamingOutcome, Reply, StatusMap};
pub use linkplay_discovery::{ConfirmedDevice, DiscoveryConfig, NetworkPrefix};

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use linkplay_discovery::Discovery;

/// Discover speakers with the default configuration
///
/// Returns an empty list when nothing answers; that is not an error.
pub fn discover() -> Vec<ConfirmedDevice> {
    linkplay_discovery::get()
}

/// Discover speakers with a custom configuration
pub fn discover_with(config: DiscoveryConfig) -> Vec<ConfirmedDevice> {
    linkplay_discovery::get_with_config(config)
}

/// Discover speakers; setting `cancel` stops the scan phase early
pub fn discover_cancellable(
    config: DiscoveryConfig,
    cancel: Arc<AtomicBool>,
) -> Vec<ConfirmedDevice> {
    Discovery::with_cancel_flag(config, cancel).discover()
}

/// Actively scan one /24 given as `"192.168.1"` or `"192.168.1.0/24"`
///
/// Skips multicast. Fails only when `prefix` does not parse.
pub fn scan(prefix: &str) -> Result<Vec<ConfirmedDevice>, SdkError> {
    let prefix: NetworkPrefix = prefix.parse()?;
    Ok(linkplay_discovery::scan_network(prefix, &DiscoveryConfig::default()))
}

/// Discover and wrap every device in a [`Speaker`] handle
pub fn discover_speakers() -> Vec<Speaker> {
    discover().iter().map(Speaker::from_device).collect()
}

/// Find a speaker by its reported name (case-insensitive)
pub fn find_speaker(speakers: &[Speaker], name: &str) -> Result<Speaker, SdkError> {
    speakers
        .iter()
        .find(|s| s.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
        .cloned()
        .ok_or_else(|| SdkError::SpeakerNotFound(name.to_string()))
}

/// Send `command` with `params` to the speaker at `ip`
///
/// `send("192.168.1.50", "setPlayerCmd", &["vol", "20"])` sends
/// `setPlayerCmd:vol:20`. `None` means the device gave no usable answer.
pub fn send(ip: &str, command: &str, params: &[&str]) -> Option<Reply> {
    CommandClient::new().send(ip, &Command::new(command).params(params))
}
