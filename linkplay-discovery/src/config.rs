//! Configuration for discovery runs
//!
//! Every timeout, port and limit used by the discovery engine lives here so
//! tests can point the engine at loopback sockets with short timeouts.

use std::net::SocketAddr;
use std::time::Duration;

use crate::network::NetworkPrefix;

/// SSDP multicast group and port
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// Search target sent in the M-SEARCH request
pub const MEDIA_RENDERER_ST: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

/// TCP port probed before a device is asked for its status
pub const LINKPLAY_PORT: u16 = 8080;

/// Configuration for a discovery run
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Where the M-SEARCH request is sent
    /// Default: 239.255.255.250:1900
    pub multicast_addr: SocketAddr,

    /// Value of the ST header
    /// Default: urn:schemas-upnp-org:device:MediaRenderer:1
    pub search_target: String,

    /// How long to collect multicast replies
    /// Default: 5 seconds
    pub multicast_window: Duration,

    /// IP_MULTICAST_TTL for the search request
    /// Default: 2
    pub multicast_ttl: u32,

    /// Port that must be open before a candidate is queried
    /// Default: 8080
    pub probe_port: u16,

    /// HTTP port for command requests
    /// Default: 80
    pub command_port: u16,

    /// Connect timeout for the port probe
    /// Default: 500 milliseconds
    pub probe_timeout: Duration,

    /// Timeout for the status request sent to an open port
    /// Default: 2 seconds
    pub verify_timeout: Duration,

    /// Upper bound on concurrent verifications during an active scan
    /// Default: 50
    pub max_workers: usize,

    /// Network to scan; `None` means detect from the local address
    /// Default: None
    pub network_prefix: Option<NetworkPrefix>,

    /// Network scanned when detection fails
    /// Default: 192.168.1
    pub fallback_prefix: NetworkPrefix,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            multicast_addr: SocketAddr::from(([239, 255, 255, 250], 1900)),
            search_target: MEDIA_RENDERER_ST.to_string(),
            multicast_window: Duration::from_secs(5),
            multicast_ttl: 2,
            probe_port: LINKPLAY_PORT,
            command_port: linkplay_api::DEFAULT_HTTP_PORT,
            probe_timeout: Duration::from_millis(500),
            verify_timeout: Duration::from_secs(2),
            max_workers: 50,
            network_prefix: None,
            fallback_prefix: NetworkPrefix::new(192, 168, 1),
        }
    }
}

impl DiscoveryConfig {
    /// Create a DiscoveryConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorter waits for interactive use on a quiet network
    pub fn quick() -> Self {
        Self {
            multicast_window: Duration::from_secs(2),
            probe_timeout: Duration::from_millis(250),
            verify_timeout: Duration::from_secs(1),
            ..Default::default()
        }
    }

    pub fn with_multicast_addr(mut self, addr: SocketAddr) -> Self {
        self.multicast_addr = addr;
        self
    }

    pub fn with_multicast_window(mut self, window: Duration) -> Self {
        self.multicast_window = window;
        self
    }

    pub fn with_probe_port(mut self, port: u16) -> Self {
        self.probe_port = port;
        self
    }

    pub fn with_command_port(mut self, port: u16) -> Self {
        self.command_port = port;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    /// Set the worker ceiling; zero is raised to one
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    pub fn with_network_prefix(mut self, prefix: NetworkPrefix) -> Self {
        self.network_prefix = Some(prefix);
        self
    }

    /// Worker ceiling as used by the scanner
    pub fn effective_workers(&self) -> usize {
        self.max_workers.max(1)
    }
}
