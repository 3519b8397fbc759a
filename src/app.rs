use crate::state::app_settings::{AppSettings, Settings, SettingsField, SourceConfig};
use crate::state::app_state::{AppState, InputMode};
use crate::state::favorites::Favorites;
use crate::state::feed::FeedEvent;
use crate::state::storage::KeyValueStore;
use crate::state::view::{self, DateRange, LeagueFilter, LeagueGroup, ViewQuery};
use chrono::{DateTime, Local};
use log::info;
use scoreline_api::Match;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Scores,
    Settings,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub config: Settings,
    pub favorites: Favorites,
    pub state: AppState,
    store: Box<dyn KeyValueStore>,
}

impl App {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let settings = AppSettings::load();
        let config = Settings::load(store.as_ref());
        let favorites = Favorites::load(store.as_ref());

        let app = Self {
            state: AppState::new(),
            settings,
            config,
            favorites,
            store,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Source activation + feed events — called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Begin a new activation. The caller starts the tasks for the returned
    /// source under the returned generation.
    pub fn activate_sources(&mut self) -> (SourceConfig, u64) {
        let source = self.config.source();
        let generation = self.state.feed.activate(source.push_enabled());
        (source, generation)
    }

    pub fn deactivate_sources(&mut self) {
        self.state.feed.deactivate();
    }

    /// Source and generation for an out-of-band refresh.
    pub fn current_source(&self) -> (SourceConfig, u64) {
        (self.config.source(), self.state.feed.generation())
    }

    pub fn on_feed_event(&mut self, event: FeedEvent) -> bool {
        let applied = self.state.feed.apply(event);
        if applied {
            self.clamp_selection();
        }
        applied
    }

    // -----------------------------------------------------------------------
    // Derived view
    // -----------------------------------------------------------------------

    pub fn view_query(&self) -> ViewQuery {
        ViewQuery {
            live_only: self.config.show_only_live,
            league: self.state.scores.league.clone(),
            date: self.state.scores.date,
            search: self.state.scores.search.clone(),
        }
    }

    pub fn groups_at(&self, now: &DateTime<Local>) -> Vec<LeagueGroup<'_>> {
        view::derive_view(&self.state.feed.matches, &self.view_query(), &self.favorites, now)
    }

    pub fn groups(&self) -> Vec<LeagueGroup<'_>> {
        self.groups_at(&Local::now())
    }

    pub fn league_options(&self) -> Vec<String> {
        view::league_options(&self.state.feed.matches)
    }

    fn visible_count(&self) -> usize {
        self.groups().iter().map(|g| g.rows.len()).sum()
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.groups()
            .into_iter()
            .flat_map(|g| g.rows)
            .nth(self.state.scores.selected)
            .map(|row| row.item)
    }

    fn clamp_selection(&mut self) {
        let max = self.visible_count().saturating_sub(1);
        self.state.scores.selected = self.state.scores.selected.min(max);
    }

    // -----------------------------------------------------------------------
    // Scoreboard controls
    // -----------------------------------------------------------------------

    pub fn select_next(&mut self) {
        let max = self.visible_count().saturating_sub(1);
        self.state.scores.selected = (self.state.scores.selected + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.state.scores.selected = self.state.scores.selected.saturating_sub(1);
    }

    /// Step through "all" followed by each league name, alphabetically.
    pub fn cycle_league(&mut self, forward: bool) {
        let options = self.league_options();
        let current = match &self.state.scores.league {
            LeagueFilter::All => 0,
            LeagueFilter::Named(name) => options
                .iter()
                .position(|o| view::same_league(o, name))
                .map(|i| i + 1)
                .unwrap_or(0),
        };
        let slots = options.len() + 1;
        let next = if forward { (current + 1) % slots } else { (current + slots - 1) % slots };
        self.state.scores.league = match next {
            0 => LeagueFilter::All,
            i => LeagueFilter::Named(options[i - 1].clone()),
        };
        self.state.scores.selected = 0;
    }

    pub fn toggle_date_range(&mut self) {
        self.state.scores.date = self.state.scores.date.toggle();
        self.state.scores.selected = 0;
    }

    pub fn toggle_live_only(&mut self) {
        self.config.show_only_live = !self.config.show_only_live;
        self.state.scores.selected = 0;
        self.persist_settings();
    }

    pub fn toggle_compact(&mut self) {
        self.config.compact = !self.config.compact;
        self.persist_settings();
    }

    pub fn toggle_favorite_selected(&mut self) {
        let Some(selected) = self.selected_match().cloned() else {
            return;
        };
        self.favorites.toggle_match(&selected);
        self.favorites.save(self.store.as_mut());
    }

    pub fn begin_search(&mut self) {
        self.state.input = InputMode::Search;
    }

    pub fn search_push(&mut self, c: char) {
        self.state.scores.search.push(c);
        self.state.scores.selected = 0;
    }

    pub fn search_pop(&mut self) {
        self.state.scores.search.pop();
        self.state.scores.selected = 0;
    }

    /// Leave search mode. `keep = false` also clears the query.
    pub fn end_search(&mut self, keep: bool) {
        if !keep {
            self.state.scores.search.clear();
            self.state.scores.selected = 0;
        }
        self.state.input = InputMode::Normal;
    }

    pub fn reset_filters(&mut self) {
        self.state.scores.league = LeagueFilter::All;
        self.state.scores.date = DateRange::default();
        self.state.scores.search.clear();
        self.state.scores.selected = 0;
    }

    // -----------------------------------------------------------------------
    // Settings tab
    // -----------------------------------------------------------------------

    pub fn settings_cursor_down(&mut self) {
        let max = SettingsField::ALL.len() - 1;
        self.state.settings_tab.cursor = (self.state.settings_tab.cursor + 1).min(max);
    }

    pub fn settings_cursor_up(&mut self) {
        self.state.settings_tab.cursor = self.state.settings_tab.cursor.saturating_sub(1);
    }

    pub fn begin_edit_setting(&mut self) {
        let field = self.state.settings_tab.field();
        self.state.input = InputMode::EditSetting { field, buffer: field.value(&self.config) };
        self.state.notice = None;
    }

    pub fn edit_push(&mut self, c: char) {
        if let InputMode::EditSetting { buffer, .. } = &mut self.state.input {
            buffer.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let InputMode::EditSetting { buffer, .. } = &mut self.state.input {
            buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.state.input = InputMode::Normal;
    }

    /// Write the edit buffer into settings and persist. Returns true when the
    /// change affects the data sources and they must be restarted.
    pub fn commit_edit(&mut self) -> bool {
        let InputMode::EditSetting { field, buffer } = std::mem::take(&mut self.state.input) else {
            return false;
        };

        let before = self.config.source();
        if let Err(message) = field.apply(&mut self.config, &buffer) {
            self.state.notice = Some(message);
            self.state.input = InputMode::EditSetting { field, buffer };
            return false;
        }

        self.persist_settings();
        let changed = self.config.source() != before;
        if changed {
            info!("{} changed, restarting sources", field.label());
        }
        changed
    }

    fn persist_settings(&mut self) {
        self.config.save(self.store.as_mut());
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.input = InputMode::Normal;
        self.state.notice = None;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::SETTINGS_KEY;
    use crate::state::favorites::FAVORITES_KEY;
    use crate::state::storage::MemoryStore;
    use scoreline_api::sample::sample_matches;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// MemoryStore that stays inspectable after being boxed into the App.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            self.0.lock().unwrap().set(key, value)
        }
    }

    fn loaded_app() -> (App, SharedStore) {
        let store = SharedStore::default();
        let mut app = App::new(Box::new(store.clone()));
        let (_, generation) = app.activate_sources();
        app.on_feed_event(FeedEvent::RefreshSucceeded {
            generation,
            matches: sample_matches(),
            completed_at: Local::now(),
        });
        app.state.scores.date = DateRange::All;
        (app, store)
    }

    #[test]
    fn favorite_toggle_on_selection_is_persisted() {
        let (mut app, store) = loaded_app();
        let selected = app.selected_match().cloned().unwrap();

        app.toggle_favorite_selected();
        let saved = store.get(FAVORITES_KEY).unwrap();
        for name in selected.team_names() {
            assert!(saved.contains(name), "{saved}");
        }

        app.toggle_favorite_selected();
        assert_eq!(store.get(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn compact_and_live_only_toggles_are_persisted() {
        let (mut app, store) = loaded_app();
        app.toggle_compact();
        app.toggle_live_only();

        let saved = Settings::load(&store);
        assert!(saved.compact);
        assert!(saved.show_only_live);
        assert!(store.get(SETTINGS_KEY).is_some());
    }

    #[test]
    fn editing_source_url_requests_restart() {
        let (mut app, store) = loaded_app();
        app.state.settings_tab.cursor = 0;
        app.begin_edit_setting();
        for c in "https://scores.example/api".chars() {
            app.edit_push(c);
        }
        assert!(app.commit_edit());
        assert_eq!(app.state.input, InputMode::Normal);
        assert_eq!(Settings::load(&store).source_url, "https://scores.example/api");
    }

    #[test]
    fn committing_unchanged_value_does_not_restart() {
        let (mut app, _) = loaded_app();
        app.begin_edit_setting();
        assert!(!app.commit_edit());
    }

    #[test]
    fn invalid_interval_keeps_editing_with_notice() {
        let (mut app, _) = loaded_app();
        app.state.settings_tab.cursor = 3;
        app.begin_edit_setting();
        app.edit_push('x');

        assert!(!app.commit_edit());
        assert!(matches!(app.state.input, InputMode::EditSetting { .. }));
        assert!(app.state.notice.is_some());
    }

    #[test]
    fn cycle_league_walks_all_then_alphabetical_names() {
        let (mut app, _) = loaded_app();
        let options = app.league_options();
        assert_eq!(options, vec!["La Liga", "Premier League", "Serie A"]);

        app.cycle_league(true);
        assert_eq!(app.state.scores.league, LeagueFilter::Named("La Liga".into()));
        app.cycle_league(false);
        assert_eq!(app.state.scores.league, LeagueFilter::All);
        app.cycle_league(false);
        assert_eq!(app.state.scores.league, LeagueFilter::Named("Serie A".into()));
    }

    #[test]
    fn league_options_do_not_shrink_when_filtered() {
        let (mut app, _) = loaded_app();
        app.state.scores.search = "arbor".into();
        assert_eq!(app.groups().len(), 1);
        assert_eq!(app.league_options().len(), 3);
    }

    #[test]
    fn selection_is_clamped_when_snapshot_shrinks() {
        let (mut app, _) = loaded_app();
        app.state.scores.selected = 4;

        let generation = app.state.feed.generation();
        let mut fewer = sample_matches();
        fewer.truncate(2);
        app.on_feed_event(FeedEvent::LiveSnapshot { generation, matches: fewer });
        assert_eq!(app.state.scores.selected, 1);
    }

    #[test]
    fn deactivated_app_ignores_late_refresh() {
        let (mut app, _) = loaded_app();
        let generation = app.state.feed.generation();
        app.deactivate_sources();

        let applied = app.on_feed_event(FeedEvent::RefreshSucceeded {
            generation,
            matches: Vec::new(),
            completed_at: Local::now(),
        });
        assert!(!applied);
        assert_eq!(app.state.feed.matches.len(), 5);
    }

    #[test]
    fn cycle_league_keeps_position_for_non_ascii_case() {
        let (mut app, _) = loaded_app();
        for m in app.state.feed.matches.iter_mut().filter(|m| m.league.name == "Serie A") {
            m.league.name = "Süper Lig".into();
        }
        app.state.scores.league = LeagueFilter::Named("SÜPER LIG".into());

        app.cycle_league(false);
        assert_eq!(app.state.scores.league, LeagueFilter::Named("Premier League".into()));
    }
}
