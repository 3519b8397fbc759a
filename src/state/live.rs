use crate::state::feed::FeedEvent;
use futures_util::StreamExt;
use log::{debug, info, warn};
use scoreline_api::Match;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Websocket listener for whole-snapshot pushes. Receive-only: the channel
/// is expected to start sending as soon as the connection opens.
#[derive(Debug)]
pub struct LiveWorker {
    pub url: String,
    pub generation: u64,
    pub events: mpsc::Sender<FeedEvent>,
}

/// A push payload is only usable if the whole thing is a match array.
pub fn parse_snapshot(text: &str) -> Option<Vec<Match>> {
    match serde_json::from_str::<Vec<Match>>(text) {
        Ok(matches) => Some(matches),
        Err(e) => {
            debug!("ignoring push message: {e}");
            None
        }
    }
}

impl LiveWorker {
    pub async fn run(self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((mut stream, _)) => {
                    info!("push channel connected to {}", self.url);
                    self.emit(FeedEvent::LiveConnected { generation: self.generation }).await;

                    while let Some(inbound) = stream.next().await {
                        match inbound {
                            Ok(Message::Text(text)) => self.ingest(text.as_str()).await,
                            Ok(Message::Binary(bytes)) => {
                                if let Ok(text) = std::str::from_utf8(&bytes) {
                                    self.ingest(text).await;
                                }
                            }
                            Ok(Message::Close(_)) => break,
                            Ok(_) => {}
                            Err(e) => {
                                self.warn(format!("read failed: {e}")).await;
                                break;
                            }
                        }
                    }
                    self.warn("disconnected, retrying".to_owned()).await;
                }
                Err(e) => self.warn(format!("connect to {} failed: {e}", self.url)).await,
            }

            if self.events.is_closed() {
                return;
            }
            sleep(RECONNECT_DELAY).await;
        }
    }

    async fn ingest(&self, text: &str) {
        if let Some(matches) = parse_snapshot(text) {
            debug!("push snapshot with {} matches", matches.len());
            self.emit(FeedEvent::LiveSnapshot { generation: self.generation, matches })
                .await;
        }
    }

    async fn warn(&self, message: String) {
        warn!("push channel: {message}");
        self.emit(FeedEvent::LiveWarning { generation: self.generation, message }).await;
    }

    async fn emit(&self, event: FeedEvent) {
        let _ = self.events.send(event).await;
    }
}
