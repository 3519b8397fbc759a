mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::keys::KeyAction;
use crate::state::feed::FeedEvent;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::InFlight;
use crate::state::sources::SourceTasks;
use crate::state::storage::FileStore;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{debug, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let store = FileStore::in_config_dir();
    info!("config dir: {}", store.dir().display());
    let mut app = App::new(Box::new(store));
    app.config.apply_overrides(|key| std::env::var(key).ok());
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (live_evt_tx, live_evt_rx) = mpsc::channel::<FeedEvent>(100);

    let in_flight = InFlight::default();

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(network_req_rx, network_resp_tx, in_flight.clone());
    let network_task = tokio::spawn(network_worker.run());

    // Wall clock tick, keeps "today" honest across midnight
    let clock_tx = ui_event_tx.clone();
    let clock_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            if clock_tx.send(UiEvent::ClockTick).await.is_err() {
                break;
            }
        }
    });

    let sources = SourceTasks::new(network_req_tx, live_evt_tx, in_flight);

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_resp_rx, live_evt_rx, sources).await;

    input_handler.abort();
    network_task.abort();
    clock_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("scoreline {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "scoreline - live football scores in the terminal

Usage:
  scoreline
  scoreline --help
  scoreline --version

Environment:
  SCORELINE_SOURCE_URL   REST endpoint returning the match list (empty = sample data)
  SCORELINE_API_KEY      Sent as the x-apisports-key header
  SCORELINE_PUSH_URL     WebSocket URL pushing whole snapshots (optional)
  SCORELINE_POLL_SECS    Seconds between refreshes, 0 disables polling
  SCORELINE_CONFIG_DIR   Where settings and favorites are stored
  SCORELINE_LOG          Log level (error, warn, info, debug, trace)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut live_events: mpsc::Receiver<FeedEvent>,
    mut sources: SourceTasks,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &mut sources).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(event) = live_events.recv() => {
                let should_redraw = app.lock().await.on_feed_event(event);
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    sources: &mut SourceTasks,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            start_sources(app, sources).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            match keys::handle_key_bindings(key_event, app).await {
                KeyAction::None => {}
                KeyAction::RefreshNow => {
                    let (source, generation) = app.lock().await.current_source();
                    sources.refresh_now(source, generation);
                }
                KeyAction::RestartSources => start_sources(app, sources).await,
            }
            true
        }
        UiEvent::Resize => true,
        UiEvent::ClockTick => true,
    }
}

/// Stop whatever is running and start over under a fresh generation.
async fn start_sources(app: &Arc<Mutex<App>>, sources: &mut SourceTasks) {
    let (source, generation) = {
        let mut guard = app.lock().await;
        guard.deactivate_sources();
        guard.activate_sources()
    };
    sources.start(source, generation);
    debug!("push task running: {}", sources.push_running());
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            true
        }
        NetworkResponse::Feed(event) => app.lock().await.on_feed_event(event),
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
