use crate::app::{App, MenuItem};
use crate::state::app_state::InputMode;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Follow-up work the UI loop must do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    RefreshNow,
    RestartSources,
}

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) -> KeyAction {
    let mut guard = app.lock().await;

    if (key_event.code, key_event.modifiers) == (Char('c'), KeyModifiers::CONTROL) {
        quit();
    }

    // Text entry swallows everything except its own control keys.
    match guard.state.input.clone() {
        InputMode::Search => {
            match key_event.code {
                KeyCode::Enter => guard.end_search(true),
                KeyCode::Esc => guard.end_search(false),
                KeyCode::Backspace => guard.search_pop(),
                Char(c) => guard.search_push(c),
                _ => {}
            }
            return KeyAction::None;
        }
        InputMode::EditSetting { .. } => {
            match key_event.code {
                KeyCode::Enter => {
                    if guard.commit_edit() {
                        return KeyAction::RestartSources;
                    }
                }
                KeyCode::Esc => guard.cancel_edit(),
                KeyCode::Backspace => guard.edit_pop(),
                Char(c) => guard.edit_push(c),
                _ => {}
            }
            return KeyAction::None;
        }
        InputMode::Normal => {}
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => quit(),

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Scores),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Settings),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Scoreboard
        (MenuItem::Scores, Char('j') | KeyCode::Down, _) => guard.select_next(),
        (MenuItem::Scores, Char('k') | KeyCode::Up, _) => guard.select_prev(),
        (MenuItem::Scores, Char('/'), _) => guard.begin_search(),
        (MenuItem::Scores, Char('l'), _) => guard.cycle_league(true),
        (MenuItem::Scores, Char('L'), _) => guard.cycle_league(false),
        (MenuItem::Scores, Char('t'), _) => guard.toggle_date_range(),
        (MenuItem::Scores, Char('v'), _) => guard.toggle_live_only(),
        (MenuItem::Scores, Char('c'), _) => guard.toggle_compact(),
        (MenuItem::Scores, Char('f'), _) => guard.toggle_favorite_selected(),
        (MenuItem::Scores, KeyCode::Esc, _) => guard.reset_filters(),

        // Settings
        (MenuItem::Settings, Char('j') | KeyCode::Down, _) => guard.settings_cursor_down(),
        (MenuItem::Settings, Char('k') | KeyCode::Up, _) => guard.settings_cursor_up(),
        (MenuItem::Settings, KeyCode::Enter, _) => guard.begin_edit_setting(),
        (MenuItem::Settings, KeyCode::Esc, _) => guard.update_tab(MenuItem::Scores),

        // Global
        (_, Char('r'), _) => return KeyAction::RefreshNow,
        (_, Char('F'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    KeyAction::None
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}
