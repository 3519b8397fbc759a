//! Development relay for the push channel. Serves whole-snapshot JSON to
//! every connected websocket client, once on connect and then on each tick.
//!
//!   push-relay [snapshot.json]
//!
//! With a file argument the file is re-read on every tick, so editing it
//! pushes the change. Without one the built-in sample set is used and the
//! clock of running matches advances by a minute per tick.

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use scoreline_api::sample::sample_matches;
use scoreline_api::{Match, MatchStatus};
use std::env;
use std::path::PathBuf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::time::{Duration, interval};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::var("SCORELINE_RELAY_BIND").unwrap_or_else(|_| "127.0.0.1:8788".to_string());
    let every = env::var("SCORELINE_RELAY_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    let snapshot_path = env::args().nth(1).map(PathBuf::from);

    let mut source = SnapshotSource { path: snapshot_path, sample: sample_matches() };
    let (tx, _rx) = watch::channel(source.next().await?);

    let listener = TcpListener::bind(&addr).await?;
    eprintln!("push relay listening on ws://{addr}, tick every {every}s");

    let ticker_tx = tx.clone();
    tokio::spawn(async move {
        let mut ticks = interval(Duration::from_secs(every));
        ticks.tick().await;
        loop {
            ticks.tick().await;
            match source.next().await {
                Ok(payload) => {
                    let _ = ticker_tx.send(payload);
                }
                Err(e) => eprintln!("snapshot skipped: {e:#}"),
            }
        }
    });

    loop {
        let (stream, peer) = listener.accept().await?;
        let rx = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, rx).await {
                eprintln!("client {peer} disconnected: {e}");
            }
        });
    }
}

struct SnapshotSource {
    path: Option<PathBuf>,
    sample: Vec<Match>,
}

impl SnapshotSource {
    async fn next(&mut self) -> anyhow::Result<String> {
        match &self.path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                // Refuse to relay anything the client would discard.
                serde_json::from_str::<Vec<Match>>(&text)
                    .with_context(|| format!("{} is not a match array", path.display()))?;
                Ok(text)
            }
            None => {
                let payload = serde_json::to_string(&self.sample)?;
                advance_clock(&mut self.sample);
                Ok(payload)
            }
        }
    }
}

fn advance_clock(matches: &mut [Match]) {
    for m in matches.iter_mut().filter(|m| m.status == MatchStatus::Live) {
        let minute = m.minute.unwrap_or(0) + 1;
        if minute > 90 {
            m.status = MatchStatus::FullTime;
            m.minute = None;
        } else {
            m.minute = Some(minute);
        }
    }
}

async fn handle_client(stream: TcpStream, mut rx: watch::Receiver<String>) -> anyhow::Result<()> {
    let ws = accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    let initial = rx.borrow_and_update().clone();
    write.send(Message::Text(initial.into())).await?;

    loop {
        tokio::select! {
            inbound = read.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let payload = rx.borrow_and_update().clone();
                write.send(Message::Text(payload.into())).await?;
            }
        }
    }

    Ok(())
}
