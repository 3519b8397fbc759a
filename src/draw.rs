use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::scoreboard::scoreboard_lines;
use crate::state::app_settings::SettingsField;
use crate::state::app_state::InputMode;
use crate::state::feed::PushStatus;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["Scores", "Settings"];

const HELP_TEXT: &str = "\
Scores
  j/k ↑/↓   move selection
  /         search teams, leagues and countries (Enter keeps, Esc clears)
  l / L     next / previous league
  t         toggle today / all dates
  v         live matches only
  c         compact view
  f         favorite both teams of the selected match
  Esc       reset filters

Settings
  j/k       choose field
  Enter     edit, then Enter to save or Esc to cancel

Global
  r         refresh now
  1 2 ?     Scores, Settings, Help
  F         full screen
  \"         log pane
  q         quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Scores => draw_scores(f, layout.main, app),
            MenuItem::Settings => draw_settings(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_status_bar(f, layout.status, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Scores => 0,
        MenuItem::Settings => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_scores(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Scores ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [filter_bar, search_bar, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(filter_summary(app)), filter_bar);

    let searching = app.state.input == InputMode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if searching { "▏" } else { "" };
    f.render_widget(
        Paragraph::new(format!("Search: {}{cursor}", app.state.scores.search)).style(search_style),
        search_bar,
    );

    let groups = app.groups();
    if groups.is_empty() {
        let msg = if app.state.feed.matches.is_empty() {
            match (app.state.feed.loading, app.state.feed.error.as_deref()) {
                (_, Some(err)) => format!("Could not load matches:\n{err}"),
                (true, None) => "Loading matches...".to_string(),
                (false, None) => "No matches in the current snapshot".to_string(),
            }
        } else {
            "No matches for these filters (Esc resets)".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            content,
        );
        return;
    }

    let board = scoreboard_lines(&groups, app.state.scores.selected, app.config.compact);
    let height = content.height as usize;
    let scroll = board
        .selected_line
        .map(|line| line.saturating_sub(height.saturating_sub(2)))
        .unwrap_or(0);
    f.render_widget(
        Paragraph::new(board.lines).scroll((scroll as u16, 0)),
        content,
    );
}

fn filter_summary(app: &App) -> Line<'static> {
    let on = Style::default().fg(Color::Cyan);
    let off = Style::default().fg(Color::DarkGray);
    let live_style = if app.config.show_only_live { on } else { off };
    let compact_style = if app.config.compact { on } else { off };

    Line::from(vec![
        Span::styled(app.state.scores.league.label().to_owned(), on),
        Span::raw(" | "),
        Span::styled(app.state.scores.date.label(), on),
        Span::raw(" | "),
        Span::styled("live only", live_style),
        Span::raw(" | "),
        Span::styled("compact", compact_style),
        Span::raw(" | "),
        Span::styled(format!("★ {}", app.favorites.len()), off),
        Span::styled(format!("   times in {}", app.config.timezone), off),
    ])
}

fn draw_settings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Settings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    lines.push(Line::styled(
        "j/k to choose, Enter to edit. Changes are saved immediately.",
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::default());

    for (idx, field) in SettingsField::ALL.iter().enumerate() {
        let selected = idx == app.state.settings_tab.cursor;
        let (value, editing) = match &app.state.input {
            InputMode::EditSetting { field: editing, buffer } if editing == field => {
                (format!("{buffer}▏"), true)
            }
            _ => (display_value(*field, app), false),
        };
        let marker = if selected { ">" } else { " " };
        let value_style = if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker} {:<18}", field.label())),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        "Empty source URL uses built-in sample data. Interval 0 disables polling.",
        Style::default().fg(Color::DarkGray),
    ));
    if let Some(notice) = app.state.notice.as_deref() {
        lines.push(Line::styled(notice.to_owned(), Style::default().fg(Color::Red)));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn display_value(field: SettingsField, app: &App) -> String {
    let value = field.value(&app.config);
    match field {
        SettingsField::ApiKey if !value.is_empty() => "•".repeat(value.chars().count().min(12)),
        SettingsField::SourceUrl if value.is_empty() => "(sample data)".to_string(),
        SettingsField::PushUrl if value.is_empty() => "(disabled)".to_string(),
        _ => value,
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(HELP_TEXT), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let feed = &app.state.feed;
    let mut spans = Vec::new();

    match feed.last_updated {
        Some(at) => spans.push(Span::raw(format!(" Updated {}", at.format("%H:%M:%S")))),
        None => spans.push(Span::raw(" Not loaded yet")),
    }

    match &feed.push {
        PushStatus::Disabled => {}
        PushStatus::Connecting => {
            spans.push(Span::styled("  push: connecting", Style::default().fg(Color::DarkGray)))
        }
        PushStatus::Connected => {
            spans.push(Span::styled("  push: live", Style::default().fg(Color::Green)))
        }
        PushStatus::Degraded(_) => {
            spans.push(Span::styled("  push: offline", Style::default().fg(Color::Yellow)))
        }
    }

    if let Some(err) = feed.error.as_deref() {
        spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    } else if let Some(notice) = app.state.notice.as_deref() {
        spans.push(Span::styled(format!("  {notice}"), Style::default().fg(Color::Yellow)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
