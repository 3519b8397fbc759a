use crate::state::app_settings::SourceConfig;
use crate::state::messages::NetworkRequest;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// Count of refresh requests queued or running. Shared by the refresher,
/// the manual refresh key and the network worker.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    /// Claim the slot only if nothing is pending.
    pub fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Claim unconditionally.
    pub fn begin(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    pub fn finish(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }
}

/// Periodic score refresh for one source activation.
///
/// Refreshes once immediately, then every `poll_interval` unless it is
/// zero. A tick is skipped while an earlier refresh is still pending, so
/// results never overlap. Aborting the task cancels the timer.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    source: SourceConfig,
    generation: u64,
    in_flight: InFlight,
}

impl PeriodicRefresher {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        source: SourceConfig,
        generation: u64,
        in_flight: InFlight,
    ) -> Self {
        Self { network_requests, source, generation, in_flight }
    }

    pub async fn run(self) {
        // The activation refresh queues behind any stale request instead of
        // being skipped, so the new source always loads promptly.
        self.in_flight.begin();
        if !self.send_refresh().await {
            return;
        }

        if self.source.poll_interval.is_zero() {
            debug!("periodic polling disabled");
            return;
        }

        let mut ticker = interval(self.source.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; the activation refresh covered it.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if !self.in_flight.try_begin() {
                debug!("refresh still pending, skipping tick");
                continue;
            }
            if !self.send_refresh().await {
                break;
            }
        }
    }

    async fn send_refresh(&self) -> bool {
        let request = NetworkRequest::Refresh {
            generation: self.generation,
            source: self.source.clone(),
        };
        if self.network_requests.send(request).await.is_err() {
            self.in_flight.finish();
            return false;
        }
        true
    }
}
