//! Discovery orchestration.
//!
//! Multicast runs first because it is cheap and fast. The active scan only
//! runs when multicast comes back empty, which happens on networks that
//! filter multicast or with firmware that does not answer M-SEARCH.

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::config::DiscoveryConfig;
use crate::network::{self, NetworkPrefix};
use crate::scanner::Scanner;
use crate::ssdp;
use crate::ConfirmedDevice;

/// One way of locating devices
pub trait DiscoveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn discover(&self) -> Vec<ConfirmedDevice>;
}

/// SSDP M-SEARCH; replies are trusted without verification
#[derive(Debug, Clone)]
pub struct MulticastStrategy {
    config: DiscoveryConfig,
}

impl MulticastStrategy {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }
}

impl DiscoveryStrategy for MulticastStrategy {
    fn name(&self) -> &'static str {
        "multicast"
    }

    fn discover(&self) -> Vec<ConfirmedDevice> {
        ssdp::search(&self.config)
            .into_iter()
            .map(|ip| ConfirmedDevice::announced(ip, self.config.command_port))
            .collect()
    }
}

/// Active /24 scan of the configured or detected network
pub struct ScanStrategy {
    config: DiscoveryConfig,
    cancel: Arc<AtomicBool>,
}

impl ScanStrategy {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag with the scanner
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Configured prefix, else the local network, else the fallback
    pub fn prefix(&self) -> NetworkPrefix {
        if let Some(prefix) = self.config.network_prefix {
            return prefix;
        }

        network::local_prefix().unwrap_or_else(|| {
            tracing::warn!(
                "Could not detect local network, scanning {}.0/24",
                self.config.fallback_prefix
            );
            self.config.fallback_prefix
        })
    }
}

impl DiscoveryStrategy for ScanStrategy {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn discover(&self) -> Vec<ConfirmedDevice> {
        Scanner::from_config(&self.config)
            .with_cancel_flag(Arc::clone(&self.cancel))
            .scan(self.prefix())
    }
}

/// Multicast first, active scan as fallback
pub struct Discovery<M = MulticastStrategy, S = ScanStrategy> {
    multicast: M,
    scan: S,
}

impl Discovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            multicast: MulticastStrategy::new(config.clone()),
            scan: ScanStrategy::new(config),
        }
    }

    /// Same as [`Discovery::new`], with a flag that cancels the scan phase
    pub fn with_cancel_flag(config: DiscoveryConfig, cancel: Arc<AtomicBool>) -> Self {
        Self {
            multicast: MulticastStrategy::new(config.clone()),
            scan: ScanStrategy::new(config).with_cancel_flag(cancel),
        }
    }
}

impl<M: DiscoveryStrategy, S: DiscoveryStrategy> Discovery<M, S> {
    pub fn with_strategies(multicast: M, scan: S) -> Self {
        Self { multicast, scan }
    }

    /// Run discovery; an empty list means no devices, not a failure
    pub fn discover(&self) -> Vec<ConfirmedDevice> {
        let devices = self.run(&self.multicast);
        if !devices.is_empty() {
            return devices;
        }

        tracing::info!(
            "No devices found via {}, trying {}",
            self.multicast.name(),
            self.scan.name()
        );
        let devices = self.run(&self.scan);

        if devices.is_empty() {
            tracing::info!("No speakers found on the network");
        }
        devices
    }

    fn run(&self, strategy: &dyn DiscoveryStrategy) -> Vec<ConfirmedDevice> {
        let mut seen = HashSet::new();
        let devices: Vec<ConfirmedDevice> = strategy
            .discover()
            .into_iter()
            .filter(|device| seen.insert(device.ip))
            .collect();

        tracing::info!("{} discovery found {} device(s)", strategy.name(), devices.len());
        devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStrategy {
        name: &'static str,
        devices: Vec<ConfirmedDevice>,
        calls: AtomicUsize,
    }

    impl CountingStrategy {
        fn new(name: &'static str, hosts: &[u8]) -> Self {
            Self {
                name,
                devices: hosts
                    .iter()
                    .map(|h| ConfirmedDevice::announced(Ipv4Addr::new(192, 168, 1, *h), 80))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DiscoveryStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn discover(&self) -> Vec<ConfirmedDevice> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.devices.clone()
        }
    }

    fn hosts(devices: &[ConfirmedDevice]) -> Vec<u8> {
        devices.iter().map(|d| d.ip.octets()[3]).collect()
    }

    #[test]
    fn test_multicast_hit_skips_scan() {
        let discovery = Discovery::with_strategies(
            CountingStrategy::new("multicast", &[40]),
            CountingStrategy::new("scan", &[10]),
        );

        let devices = discovery.discover();

        assert_eq!(hosts(&devices), vec![40]);
        assert_eq!(discovery.multicast.calls(), 1);
        assert_eq!(discovery.scan.calls(), 0);
    }

    #[test]
    fn test_empty_multicast_falls_back_to_scan() {
        let discovery = Discovery::with_strategies(
            CountingStrategy::new("multicast", &[]),
            CountingStrategy::new("scan", &[10, 12]),
        );

        let devices = discovery.discover();

        assert_eq!(hosts(&devices), vec![10, 12]);
        assert_eq!(discovery.multicast.calls(), 1);
        assert_eq!(discovery.scan.calls(), 1);
    }

    #[test]
    fn test_nothing_found_is_empty_not_error() {
        let discovery = Discovery::with_strategies(
            CountingStrategy::new("multicast", &[]),
            CountingStrategy::new("scan", &[]),
        );

        assert!(discovery.discover().is_empty());
    }

    #[test]
    fn test_duplicates_removed_within_run() {
        let discovery = Discovery::with_strategies(
            CountingStrategy::new("multicast", &[40, 41, 40]),
            CountingStrategy::new("scan", &[]),
        );

        assert_eq!(hosts(&discovery.discover()), vec![40, 41]);
    }

    #[test]
    fn test_configured_prefix_wins() {
        let prefix = NetworkPrefix::new(10, 9, 8);
        let strategy = ScanStrategy::new(DiscoveryConfig::default().with_network_prefix(prefix));
        assert_eq!(strategy.prefix(), prefix);
    }
}
