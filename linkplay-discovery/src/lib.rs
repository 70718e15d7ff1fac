//! LinkPlay speaker discovery library
//!
//! Finds LinkPlay-based WiFi speakers on the local network in two ways:
//!
//! 1. **Multicast**: one SSDP M-SEARCH for MediaRenderer devices, replies
//!    filtered by their advertisement text.
//! 2. **Active scan**: if multicast finds nothing, every host of the local
//!    /24 is probed on TCP 8080 and, when open, asked for `getStatus`.
//!
//! # Quick Start
//!
//! ```no_run
//! use linkplay_discovery::get;
//!
//! for device in get() {
//!     println!("Found {} at {}", device.name().unwrap_or("speaker"), device.ip);
//! }
//! ```
//!
//! # Scanning a specific network
//!
//! ```no_run
//! use linkplay_discovery::{DiscoveryConfig, NetworkPrefix, Scanner};
//!
//! let prefix: NetworkPrefix = "10.0.0".parse()?;
//! let devices = Scanner::from_config(&DiscoveryConfig::default()).scan(prefix);
//! # Ok::<(), linkplay_discovery::DiscoveryError>(())
//! ```

mod config;
mod device;
mod discovery;
mod error;
mod network;
mod scanner;

pub mod diagnostics;
pub mod probe;
pub mod ssdp;
pub mod verify;

pub use config::{DiscoveryConfig, LINKPLAY_PORT, MEDIA_RENDERER_ST, SSDP_MULTICAST_ADDR};
pub use device::ConfirmedDevice;
pub use discovery::{Discovery, DiscoveryStrategy, MulticastStrategy, ScanStrategy};
pub use error::{DiscoveryError, Result};
pub use network::{local_ipv4, local_prefix, NetworkPrefix};
pub use scanner::Scanner;
pub use verify::{DeviceVerifier, Verifier};

/// Discover speakers with the default configuration.
///
/// Multicast is tried first; the local /24 is scanned only if multicast
/// finds nothing. Never fails: "no speakers" is an empty list.
pub fn get() -> Vec<ConfirmedDevice> {
    get_with_config(DiscoveryConfig::default())
}

/// Discover speakers with a custom configuration.
pub fn get_with_config(config: DiscoveryConfig) -> Vec<ConfirmedDevice> {
    Discovery::new(config).discover()
}

/// Multicast discovery alone, without the scan fallback.
pub fn multicast(config: &DiscoveryConfig) -> Vec<ConfirmedDevice> {
    MulticastStrategy::new(config.clone()).discover()
}

/// Active scan of `prefix` alone.
pub fn scan_network(prefix: NetworkPrefix, config: &DiscoveryConfig) -> Vec<ConfirmedDevice> {
    Scanner::from_config(config).scan(prefix)
}
