use crate::state::view::{LeagueGroup, MatchRow};
use chrono::Local;
use scoreline_api::{Match, MatchStatus};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};

const TEAM_WIDTH: usize = 22;
const COMPACT_TEAM_WIDTH: usize = 5;

/// Rendered scoreboard plus the line index of the selected row, so the
/// caller can scroll it into view.
pub struct ScoreboardLines {
    pub lines: Vec<Line<'static>>,
    pub selected_line: Option<usize>,
}

pub fn scoreboard_lines(groups: &[LeagueGroup<'_>], selected: usize, compact: bool) -> ScoreboardLines {
    let mut lines = Vec::new();
    let mut selected_line = None;
    let mut index = 0;

    for (i, group) in groups.iter().enumerate() {
        if i > 0 && !compact {
            lines.push(Line::default());
        }
        lines.push(league_header(group));

        for row in &group.rows {
            let is_selected = index == selected;
            if is_selected {
                selected_line = Some(lines.len());
            }
            lines.push(match_line(row, is_selected, compact));
            if !compact {
                lines.push(detail_line(row.item));
            }
            index += 1;
        }
    }

    ScoreboardLines { lines, selected_line }
}

fn league_header(group: &LeagueGroup<'_>) -> Line<'static> {
    let country = group
        .rows
        .first()
        .and_then(|r| r.item.league.country.clone())
        .map(|c| format!(" · {c}"))
        .unwrap_or_default();
    Line::from(vec![
        Span::styled(group.league.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(country, Style::default().fg(Color::DarkGray)),
    ])
}

/// Short text for the status column: the clock while running, kickoff
/// time before, the status code after.
pub fn status_text(m: &Match) -> String {
    match m.status {
        MatchStatus::NotStarted => m.kickoff.with_timezone(&Local).format("%H:%M").to_string(),
        MatchStatus::Live | MatchStatus::ExtraTime | MatchStatus::Penalties => {
            m.clock().unwrap_or_else(|| m.status.code().to_owned())
        }
        _ => m.status.code().to_owned(),
    }
}

fn status_style(status: MatchStatus) -> Style {
    match status {
        MatchStatus::Live | MatchStatus::ExtraTime | MatchStatus::Penalties => {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        }
        MatchStatus::HalfTime => Style::default().fg(Color::Yellow),
        MatchStatus::Postponed
        | MatchStatus::Suspended
        | MatchStatus::Interrupted
        | MatchStatus::Abandoned
        | MatchStatus::Cancelled => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Gray),
    }
}

fn match_line(row: &MatchRow<'_>, is_selected: bool, compact: bool) -> Line<'static> {
    let m = row.item;
    let width = if compact { COMPACT_TEAM_WIDTH } else { TEAM_WIDTH };
    let marker = if is_selected { ">" } else { " " };
    let star = if row.favorite { "★" } else { " " };
    let score = match m.score_line() {
        s if s.is_empty() => "vs".to_owned(),
        s => s,
    };

    let mut line = Line::from(vec![
        Span::raw(format!("{marker}{star} ")),
        Span::styled(format!("{:>6} ", status_text(m)), status_style(m.status)),
        Span::raw(format!("{:>width$}", fit(m.home.label(compact), width))),
        Span::styled(format!(" {score:^7} "), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{:<width$}", fit(m.away.label(compact), width))),
    ]);
    if is_selected {
        line = line.style(Style::default().add_modifier(Modifier::REVERSED));
    }
    line
}

fn detail_line(m: &Match) -> Line<'static> {
    let kickoff = m.kickoff.with_timezone(&Local).format("%a %d %b %H:%M");
    let mut text = format!("         {kickoff} · {}", m.status.label());
    if let Some(venue) = m.venue.as_deref().filter(|v| !v.is_empty()) {
        text.push_str(&format!(" · {venue}"));
    }
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

/// Truncate to `width` characters, marking the cut with an ellipsis.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::favorites::Favorites;
    use crate::state::view::{DateRange, ViewQuery, derive_view};
    use scoreline_api::sample::sample_matches;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn all_dates() -> ViewQuery {
        ViewQuery { date: DateRange::All, ..ViewQuery::default() }
    }

    #[test]
    fn compact_mode_is_one_line_per_match_plus_headers() {
        let matches = sample_matches();
        let groups = derive_view(&matches, &all_dates(), &Favorites::default(), &Local::now());
        let out = scoreboard_lines(&groups, 0, true);
        assert_eq!(out.lines.len(), groups.len() + matches.len());
        assert_eq!(out.selected_line, Some(1));
    }

    #[test]
    fn full_mode_adds_detail_lines_and_spacers() {
        let matches = sample_matches();
        let groups = derive_view(&matches, &all_dates(), &Favorites::default(), &Local::now());
        let out = scoreboard_lines(&groups, 1, false);
        let expected = groups.len() + matches.len() * 2 + (groups.len() - 1);
        assert_eq!(out.lines.len(), expected);
        // Header, first match, its detail line, second match.
        assert_eq!(out.selected_line, Some(3));
    }

    #[test]
    fn live_row_shows_clock_score_and_favorite_star() {
        let matches: Vec<_> = sample_matches().into_iter().take(1).collect();
        let mut favorites = Favorites::default();
        favorites.toggle_match(&matches[0]);
        let groups = derive_view(&matches, &all_dates(), &favorites, &Local::now());

        let out = scoreboard_lines(&groups, 0, false);
        let row = text(&out.lines[1]);
        assert!(row.starts_with(">★"), "{row}");
        assert!(row.contains("67'"), "{row}");
        assert!(row.contains("2 - 1"), "{row}");
        assert!(row.contains("Arbor FC") && row.contains("Seaside United"), "{row}");
    }

    #[test]
    fn status_text_covers_states() {
        let mut m = sample_matches().remove(0);
        m.minute = None;
        assert_eq!(status_text(&m), "LIVE");
        m.status = MatchStatus::HalfTime;
        assert_eq!(status_text(&m), "HT");
        m.status = MatchStatus::Abandoned;
        assert_eq!(status_text(&m), "ABD");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(fit("Kingsbridge Athletic", 5), "King…");
        assert_eq!(fit("ARB", 5), "ARB");
    }
}
