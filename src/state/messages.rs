use crate::state::app_settings::SourceConfig;
use crate::state::feed::FeedEvent;
use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Fetch one snapshot for the given source activation.
    Refresh { generation: u64, source: SourceConfig },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    Feed(FeedEvent),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Once a second, so the "today" filter follows the wall clock.
    ClockTick,
}
