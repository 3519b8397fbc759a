use crate::state::app_settings::SourceConfig;
use crate::state::feed::FeedEvent;
use crate::state::live::LiveWorker;
use crate::state::messages::NetworkRequest;
use crate::state::refresher::{InFlight, PeriodicRefresher};
use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Owns the refresher and push-channel tasks for the current activation.
pub struct SourceTasks {
    network_requests: mpsc::Sender<NetworkRequest>,
    live_events: mpsc::Sender<FeedEvent>,
    in_flight: InFlight,
    refresher: Option<JoinHandle<()>>,
    live: Option<JoinHandle<()>>,
}

impl SourceTasks {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        live_events: mpsc::Sender<FeedEvent>,
        in_flight: InFlight,
    ) -> Self {
        Self { network_requests, live_events, in_flight, refresher: None, live: None }
    }

    /// Replace any running tasks with ones for `source`.
    pub fn start(&mut self, source: SourceConfig, generation: u64) {
        self.stop();
        info!(
            "activating sources (gen {generation}): {} every {:?}",
            if source.source_url.is_empty() { "sample data" } else { source.source_url.as_str() },
            source.poll_interval
        );

        if source.push_enabled() {
            let worker = LiveWorker {
                url: source.push_url.clone(),
                generation,
                events: self.live_events.clone(),
            };
            self.live = Some(tokio::spawn(worker.run()));
        }

        let refresher = PeriodicRefresher::new(
            self.network_requests.clone(),
            source,
            generation,
            self.in_flight.clone(),
        );
        self.refresher = Some(tokio::spawn(refresher.run()));
    }

    /// Cancel the timer and close the push channel. A request already handed
    /// to the network worker still completes; its result is stale by then.
    pub fn stop(&mut self) {
        if let Some(handle) = self.refresher.take() {
            handle.abort();
        }
        if let Some(handle) = self.live.take() {
            debug!("closing push channel");
            handle.abort();
        }
    }

    /// Out-of-band refresh. Ignored while another refresh is pending.
    pub fn refresh_now(&self, source: SourceConfig, generation: u64) -> bool {
        if !self.in_flight.try_begin() {
            debug!("manual refresh ignored, one is already pending");
            return false;
        }
        let request = NetworkRequest::Refresh { generation, source };
        if self.network_requests.try_send(request).is_err() {
            self.in_flight.finish();
            return false;
        }
        true
    }

    pub fn push_running(&self) -> bool {
        self.live.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SourceTasks {
    fn drop(&mut self) {
        self.stop();
    }
}
