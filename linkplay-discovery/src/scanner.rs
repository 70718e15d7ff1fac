//! Active scan of a /24 network.
//!
//! Every candidate address goes through a [`Verifier`]. Verifications run as
//! blocking tasks on a private tokio runtime, gated by a semaphore so at most
//! `max_workers` of them (and their sockets) are in flight at once. Results
//! reach a single collector over a channel, in completion order.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::config::DiscoveryConfig;
use crate::network::NetworkPrefix;
use crate::verify::{DeviceVerifier, Verifier};
use crate::ConfirmedDevice;

/// How often progress is logged
const PROGRESS_EVERY: usize = 50;

type ProgressFn = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Concurrent verifier of candidate addresses
pub struct Scanner<V = DeviceVerifier> {
    verifier: Arc<V>,
    max_workers: usize,
    cancel: Arc<AtomicBool>,
    progress: Option<ProgressFn>,
}

impl Scanner {
    /// Scanner with the default verifier built from `config`
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Scanner::new(DeviceVerifier::from_config(config), config.effective_workers())
    }
}

impl<V: Verifier + 'static> Scanner<V> {
    pub fn new(verifier: V, max_workers: usize) -> Self {
        Self {
            verifier: Arc::new(verifier),
            max_workers: max_workers.max(1),
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Share a cancellation flag, e.g. with a Ctrl-C handler
    ///
    /// Once the flag is set no new candidate is started. Verifications already
    /// running finish on their own timeouts.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Called with `(checked, total)` after each candidate completes
    pub fn on_progress(mut self, progress: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Flag that stops the scan when set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Verify all 254 hosts of `prefix`
    pub fn scan(&self, prefix: NetworkPrefix) -> Vec<ConfirmedDevice> {
        tracing::info!("Scanning {}.0/24 with {} workers", prefix, self.max_workers);
        let hosts: Vec<Ipv4Addr> = prefix.hosts().collect();
        self.scan_hosts(&hosts)
    }

    /// Verify an explicit candidate list
    ///
    /// Duplicate candidates are verified once. The result is in completion
    /// order, not address order. Blocks the calling thread; from async code,
    /// call it inside `tokio::task::spawn_blocking`.
    pub fn scan_hosts(&self, hosts: &[Ipv4Addr]) -> Vec<ConfirmedDevice> {
        let mut seen = HashSet::new();
        let candidates: Vec<Ipv4Addr> = hosts
            .iter()
            .copied()
            .filter(|ip| seen.insert(*ip))
            .collect();

        let total = candidates.len();
        if total == 0 {
            return Vec::new();
        }

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .max_blocking_threads(self.max_workers.min(total))
            .thread_name("linkplay-scan")
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Failed to start scan runtime: {}", e);
                return Vec::new();
            }
        };

        let found = runtime.block_on(async {
            let (tx, rx) = mpsc::unbounded_channel();
            tokio::spawn(dispatch(
                candidates,
                Arc::clone(&self.verifier),
                Arc::new(Semaphore::new(self.max_workers)),
                Arc::clone(&self.cancel),
                tx,
            ));
            self.collect(rx, total).await
        });

        if self.cancel.load(Ordering::Relaxed) {
            tracing::info!("Scan cancelled; {} device(s) found before stopping", found.len());
        } else {
            tracing::info!("Scan complete: {} device(s) among {} candidates", found.len(), total);
        }

        found
    }

    async fn collect(
        &self,
        mut rx: mpsc::UnboundedReceiver<Option<ConfirmedDevice>>,
        total: usize,
    ) -> Vec<ConfirmedDevice> {
        let mut found = Vec::new();
        let mut checked = 0;

        while let Some(result) = rx.recv().await {
            checked += 1;

            if let Some(device) = result {
                tracing::info!(
                    "Found speaker at {} ({})",
                    device.ip,
                    device.name().unwrap_or("Unknown")
                );
                found.push(device);
            }

            if checked % PROGRESS_EVERY == 0 {
                tracing::debug!("Progress: {}/{} addresses checked", checked, total);
            }

            if let Some(progress) = &self.progress {
                progress(checked, total);
            }
        }

        found
    }
}

/// Start one blocking verification per candidate, each holding a permit
///
/// The channel closes once this task and every verification have dropped
/// their senders.
async fn dispatch<V: Verifier + 'static>(
    candidates: Vec<Ipv4Addr>,
    verifier: Arc<V>,
    semaphore: Arc<Semaphore>,
    cancel: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<Option<ConfirmedDevice>>,
) {
    for ip in candidates {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };

        // Checked after the wait so a flag set by a finishing task is seen
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        let verifier = Arc::clone(&verifier);
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = verifier.verify(ip);
            drop(permit);
            let _ = tx.send(result);
        });
    }
}
