use crate::app::MenuItem;
use crate::state::app_settings::SettingsField;
use crate::state::feed::FeedState;
use crate::state::view::{DateRange, LeagueFilter};

// ---------------------------------------------------------------------------
// Scoreboard query + cursor
// ---------------------------------------------------------------------------

/// Filter inputs that live only for the session. The live-only toggle is
/// part of the persisted settings instead.
#[derive(Debug, Default)]
pub struct ScoresState {
    pub league: LeagueFilter,
    pub date: DateRange,
    pub search: String,
    /// Index into the flattened rows of the derived view.
    pub selected: usize,
}

// ---------------------------------------------------------------------------
// Keyboard input mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box; keystrokes edit `ScoresState::search`.
    Search,
    EditSetting { field: SettingsField, buffer: String },
}

#[derive(Debug, Default)]
pub struct SettingsTabState {
    pub cursor: usize,
}

impl SettingsTabState {
    pub fn field(&self) -> SettingsField {
        SettingsField::ALL[self.cursor.min(SettingsField::ALL.len() - 1)]
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub feed: FeedState,
    pub scores: ScoresState,
    pub settings_tab: SettingsTabState,
    pub input: InputMode,
    /// One-line notice for the status bar (e.g. a rejected settings value).
    pub notice: Option<String>,
    pub show_logs: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
