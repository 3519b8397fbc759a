use crate::state::feed::FeedEvent;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::refresher::InFlight;
use chrono::Local;
use log::{debug, error};
use scoreline_api::client::ScoresApi;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs refresh requests one at a time against the data source adapter.
pub struct NetworkWorker {
    client: ScoresApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    in_flight: InFlight,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
        in_flight: InFlight,
    ) -> Self {
        Self {
            client: ScoresApi::new(),
            requests,
            responses,
            in_flight,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let NetworkRequest::Refresh { generation, source } = request;

            self.start_loading_animation().await;
            let _ = self
                .responses
                .send(NetworkResponse::Feed(FeedEvent::RefreshStarted { generation }))
                .await;

            debug!("refreshing matches (gen {generation})");
            let result = self
                .client
                .fetch_matches(&source.source_url, &source.api_key)
                .await;
            self.in_flight.finish();

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let event = match result {
                Ok(matches) => FeedEvent::RefreshSucceeded {
                    generation,
                    matches,
                    completed_at: Local::now(),
                },
                Err(err) => {
                    error!("Refresh failed: {err}");
                    FeedEvent::RefreshFailed { generation, message: err.to_string() }
                }
            };

            if let Err(e) = self.responses.send(NetworkResponse::Feed(event)).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
